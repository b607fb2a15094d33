// 目录读取模块
//
// 每次调用 fetch 都会独立打开连接、执行一条固定的目录查询、
// 读取全部结果后关闭连接。连接不会跨调用保留，也不做连接池。
//
// 主要组件：
// - CatalogQuery: 四种固定的目录查询
// - CatalogRow: 列名到值的通用映射
// - CatalogConnector: 连接工厂 trait，每个后端各自实现
// - ConnectionTarget: 调用方提供的连接描述，负责校验并创建连接器

mod duckdb;
mod mssql;

pub use self::duckdb::DuckDbConnector;
pub use self::mssql::MssqlConnector;

use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 目录查询类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogQuery {
    AllTables,
    AllProcedures,
    AllColumns,
    AllConstraintTableUsages,
}

impl CatalogQuery {
    /// 结果集中的列名 (统一为大写)
    pub fn column_names(self) -> &'static [&'static str] {
        match self {
            CatalogQuery::AllTables => &["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME", "TABLE_TYPE"],
            CatalogQuery::AllProcedures => {
                &["PROCEDURE_QUALIFIER", "PROCEDURE_OWNER", "PROCEDURE_NAME"]
            }
            CatalogQuery::AllColumns => &[
                "TABLE_SCHEMA",
                "TABLE_NAME",
                "COLUMN_NAME",
                "COLUMN_DEFAULT",
                "IS_NULLABLE",
                "DATA_TYPE",
                "CHARACTER_MAXIMUM_LENGTH",
                "NUMERIC_PRECISION",
                "NUMERIC_PRECISION_RADIX",
            ],
            CatalogQuery::AllConstraintTableUsages => {
                &["TABLE_SCHEMA", "TABLE_NAME", "CONSTRAINT_NAME"]
            }
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogQuery::AllTables => "表目录",
            CatalogQuery::AllProcedures => "存储过程目录",
            CatalogQuery::AllColumns => "列目录",
            CatalogQuery::AllConstraintTableUsages => "约束目录",
        };
        f.write_str(name)
    }
}

/// 一行目录数据：列名 -> 值，NULL 记为 None
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    values: BTreeMap<String, Option<String>>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一列，列名统一转成大写以兼容不同后端
    pub fn insert(&mut self, column: &str, value: Option<String>) {
        self.values.insert(column.to_ascii_uppercase(), value);
    }

    /// 链式构造，主要用于测试
    pub fn with(mut self, column: &str, value: Option<&str>) -> Self {
        self.insert(column, value.map(str::to_string));
        self
    }

    /// 读取一列；列不存在时返回 None，值为 NULL 时返回 Some(None)
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.values
            .get(&column.to_ascii_uppercase())
            .map(|v| v.as_deref())
    }

    /// 读取可空列，列必须存在
    pub fn optional(&self, column: &str) -> Result<Option<String>> {
        match self.get(column) {
            Some(value) => Ok(value.map(str::to_string)),
            None => Err(AnalyzerError::query(
                "catalog",
                format!("目录结果缺少列 {column}"),
            )),
        }
    }

    /// 读取文本列，NULL 按空字符串处理
    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.optional(column)?.unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 目录读取器
///
/// 实现方必须在每次调用内完成 打开连接 -> 查询 -> 关闭连接，
/// 无论成功还是失败返回时连接都已关闭。
pub trait CatalogConnector {
    /// 用于日志和报告头的连接描述 (不含密码)
    fn describe(&self) -> String;

    /// 执行一次目录查询并返回全部行
    fn fetch(&self, query: CatalogQuery) -> Result<Vec<CatalogRow>>;

    /// 统计表个数
    fn count_tables(&self) -> Result<u64> {
        Ok(self.fetch(CatalogQuery::AllTables)?.len() as u64)
    }
}

/// 数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Mssql,
    DuckDb,
}

impl std::str::FromStr for DatabaseKind {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(DatabaseKind::Mssql),
            "duckdb" => Ok(DatabaseKind::DuckDb),
            other => Err(AnalyzerError::invalid_target(format!(
                "不支持的数据库类型: {other}"
            ))),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Mssql => f.write_str("mssql"),
            DatabaseKind::DuckDb => f.write_str("duckdb"),
        }
    }
}

/// 连接目标：调用方提供的连接串，构造时完成校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    kind: DatabaseKind,
    connection: String,
}

impl ConnectionTarget {
    /// 校验并创建连接目标
    pub fn new(kind: DatabaseKind, connection: impl Into<String>) -> Result<Self> {
        let connection = connection.into();
        let trimmed = connection.trim();
        if trimmed.is_empty() {
            return Err(AnalyzerError::invalid_target("连接串不能为空"));
        }

        match kind {
            DatabaseKind::Mssql => mssql::validate(trimmed)?,
            DatabaseKind::DuckDb => duckdb::validate(trimmed)?,
        }

        Ok(Self {
            kind,
            connection: trimmed.to_string(),
        })
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }

    pub fn connection_string(&self) -> &str {
        &self.connection
    }

    /// 隐去密码后的连接描述
    pub fn describe(&self) -> String {
        redact_password(&self.connection)
    }

    /// 根据数据库类型创建连接器
    pub fn connector(&self) -> Result<Box<dyn CatalogConnector>> {
        match self.kind {
            DatabaseKind::Mssql => Ok(Box::new(MssqlConnector::new(self)?)),
            DatabaseKind::DuckDb => Ok(Box::new(DuckDbConnector::new(self))),
        }
    }
}

/// 把 `Password=...` / `Pwd=...` 的值替换为 ***
///
/// 按 ADO 规则切分：引号 (`"` / `'`) 或花括号包住的值里的 `;` 不是分隔符。
pub fn redact_password(connection: &str) -> String {
    split_ado_pairs(connection)
        .into_iter()
        .map(|part| match part.split_once('=') {
            Some((key, _))
                if matches!(
                    key.trim().to_ascii_lowercase().as_str(),
                    "password" | "pwd"
                ) =>
            {
                format!("{key}=***")
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// 在不被引号或花括号包住的 `;` 处切分连接串
fn split_ado_pairs(connection: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_value = false;
    let mut at_value_start = false;
    let mut closer: Option<char> = None;
    let mut chars = connection.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if let Some(end) = closer {
            if ch == end {
                // 连续两个结束符表示转义
                if chars.peek().map(|&(_, next)| next) == Some(end) {
                    chars.next();
                } else {
                    closer = None;
                }
            }
            continue;
        }

        match ch {
            ';' => {
                parts.push(&connection[start..idx]);
                start = idx + 1;
                in_value = false;
                at_value_start = false;
            }
            '=' if !in_value => {
                in_value = true;
                at_value_start = true;
            }
            c if at_value_start && c.is_whitespace() => {}
            '"' | '\'' | '{' if at_value_start => {
                closer = Some(if ch == '{' { '}' } else { ch });
                at_value_start = false;
            }
            _ => at_value_start = false,
        }
    }

    parts.push(&connection[start..]);
    parts
}
