//! DuckDB 目录读取。
//!
//! 以只读方式打开数据库文件，从 information_schema 读取与 SQL Server 同名的目录列。
//! 存储过程对应 DuckDB 的用户宏。

use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CatalogConnector, CatalogQuery, CatalogRow, ConnectionTarget};
use crate::constants::catalog::duckdb as sql;
use crate::error::{AnalyzerError, Result};

/// 校验 DuckDB 目标：必须是文件路径
pub(super) fn validate(connection: &str) -> Result<()> {
    if connection.eq_ignore_ascii_case(":memory:") {
        return Err(AnalyzerError::invalid_target(
            "DuckDB 目标必须是数据库文件，不能是内存库",
        ));
    }
    Ok(())
}

/// DuckDB 连接器
#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    path: PathBuf,
    description: String,
}

impl DuckDbConnector {
    pub fn new(target: &ConnectionTarget) -> Self {
        Self {
            path: PathBuf::from(target.connection_string()),
            description: target.describe(),
        }
    }

    /// 直接用文件路径创建连接器
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = path.display().to_string();
        Self { path, description }
    }

    fn open(&self) -> Result<Connection> {
        // 只读模式下文件不存在会直接失败，不会悄悄建出一个空库
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| AnalyzerError::connection(&self.description, e))?;
        Connection::open_with_flags(&self.path, config)
            .map_err(|e| AnalyzerError::connection(&self.description, e))
    }

    fn query_rows(&self, conn: &Connection, query: CatalogQuery) -> Result<Vec<CatalogRow>> {
        let text = match query {
            CatalogQuery::AllTables => sql::ALL_TABLES,
            CatalogQuery::AllProcedures => sql::ALL_PROCEDURES,
            CatalogQuery::AllColumns => sql::ALL_COLUMNS,
            CatalogQuery::AllConstraintTableUsages => sql::ALL_CONSTRAINT_TABLE_USAGES,
        };
        let columns = query.column_names();

        let mut stmt = conn
            .prepare(text)
            .map_err(|e| AnalyzerError::query(&self.description, e))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| AnalyzerError::query(&self.description, e))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| AnalyzerError::query(&self.description, e))?
        {
            let mut catalog_row = CatalogRow::new();
            for (idx, name) in columns.iter().enumerate() {
                let value: Value = row
                    .get(idx)
                    .map_err(|e| AnalyzerError::query(&self.description, e))?;
                catalog_row.insert(name, render_value(value));
            }
            result.push(catalog_row);
        }

        Ok(result)
    }
}

impl CatalogConnector for DuckDbConnector {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn fetch(&self, query: CatalogQuery) -> Result<Vec<CatalogRow>> {
        let conn = self.open()?;
        let result = self.query_rows(&conn, query);

        // 显式关闭；关闭失败只记录日志，不覆盖查询结果
        if let Err((_, e)) = conn.close() {
            debug!("关闭 DuckDB 连接失败: {}", e);
        }

        if let Ok(rows) = &result {
            debug!("{} 读取{}: {} 行", self.description, query, rows.len());
        }
        result
    }
}

fn render_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s),
        Value::Boolean(v) => Some(v.to_string()),
        Value::TinyInt(v) => Some(v.to_string()),
        Value::SmallInt(v) => Some(v.to_string()),
        Value::Int(v) => Some(v.to_string()),
        Value::BigInt(v) => Some(v.to_string()),
        Value::HugeInt(v) => Some(v.to_string()),
        Value::UTinyInt(v) => Some(v.to_string()),
        Value::USmallInt(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        Value::UBigInt(v) => Some(v.to_string()),
        Value::Float(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        other => Some(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn create_db(dir: &TempDir, name: &str, ddl: &str) -> PathBuf {
        let path = dir.path().join(name);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        drop(conn);
        path
    }

    #[test]
    fn test_missing_file_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let connector = DuckDbConnector::from_path(dir.path().join("nope.duckdb"));
        let err = connector.fetch(CatalogQuery::AllTables).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        // 只读打开失败后不应留下新文件
        assert!(!dir.path().join("nope.duckdb").exists());
    }

    #[test]
    fn test_fetch_tables_and_columns() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "master.duckdb",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL, note VARCHAR);
             CREATE TABLE orders (id INTEGER, user_id INTEGER);",
        );
        let connector = DuckDbConnector::from_path(&path);

        let tables = connector.fetch(CatalogQuery::AllTables).unwrap();
        let names: Vec<String> = tables
            .iter()
            .map(|r| r.text("TABLE_NAME").unwrap())
            .collect();
        assert_eq!(names, vec!["orders".to_string(), "users".to_string()]);
        assert_eq!(connector.count_tables().unwrap(), 2);

        let columns = connector.fetch(CatalogQuery::AllColumns).unwrap();
        assert_eq!(columns.len(), 5);
        let name_col = columns
            .iter()
            .find(|r| {
                r.text("TABLE_NAME").unwrap() == "users" && r.text("COLUMN_NAME").unwrap() == "name"
            })
            .unwrap();
        assert_eq!(name_col.text("IS_NULLABLE").unwrap(), "NO");
        assert_eq!(name_col.text("DATA_TYPE").unwrap(), "VARCHAR");
    }

    #[test]
    fn test_fetch_constraints_and_macros() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "master.duckdb",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR UNIQUE);
             CREATE MACRO add_one(x) AS x + 1;",
        );
        let connector = DuckDbConnector::from_path(&path);

        let constraints = connector
            .fetch(CatalogQuery::AllConstraintTableUsages)
            .unwrap();
        assert_eq!(constraints.len(), 2);
        assert!(
            constraints
                .iter()
                .all(|r| r.text("TABLE_NAME").unwrap() == "users")
        );

        let procedures = connector.fetch(CatalogQuery::AllProcedures).unwrap();
        assert_eq!(procedures.len(), 1);
        assert_eq!(procedures[0].text("PROCEDURE_NAME").unwrap(), "add_one");
        assert_eq!(procedures[0].text("PROCEDURE_OWNER").unwrap(), "main");
    }
}
