//! SQL Server 目录读取。
//!
//! 通过 Tiberius 走 TDS 协议。每次查询新建一个连接，查询完成后立即关闭，
//! 异步驱动由连接器内部的单线程 runtime 同步执行。

use tiberius::{Client, ColumnData, Config};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, warn};

use super::{CatalogConnector, CatalogQuery, CatalogRow, ConnectionTarget};
use crate::constants::catalog::mssql as sql;
use crate::error::{AnalyzerError, Result};

type MssqlClient = Client<Compat<TcpStream>>;

/// 校验 ADO 风格的连接串
pub(super) fn validate(connection: &str) -> Result<()> {
    Config::from_ado_string(connection)
        .map(|_| ())
        .map_err(|e| AnalyzerError::invalid_target(format!("SQL Server 连接串格式错误: {e}")))
}

/// SQL Server 连接器
pub struct MssqlConnector {
    config: Config,
    description: String,
    runtime: Runtime,
}

impl MssqlConnector {
    pub fn new(target: &ConnectionTarget) -> Result<Self> {
        let config = Config::from_ado_string(target.connection_string())
            .map_err(|e| AnalyzerError::invalid_target(format!("SQL Server 连接串格式错误: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            config,
            description: target.describe(),
            runtime,
        })
    }

    async fn connect(&self) -> Result<MssqlClient> {
        let addr = self.config.get_addr();
        debug!("正在连接 SQL Server: {}", addr);

        let tcp = TcpStream::connect(&addr)
            .await
            .map_err(|e| AnalyzerError::connection(&self.description, e))?;
        tcp.set_nodelay(true).ok();

        Client::connect(self.config.clone(), tcp.compat_write())
            .await
            .map_err(|e| AnalyzerError::connection(&self.description, e))
    }

    async fn close(&self, client: MssqlClient) {
        if let Err(e) = client.close().await {
            warn!("关闭 SQL Server 连接失败: {}", e);
        }
    }

    async fn query_rows(&self, client: &mut MssqlClient, text: &str) -> Result<Vec<CatalogRow>> {
        let rows = client
            .simple_query(text)
            .await
            .map_err(|e| AnalyzerError::query(&self.description, e))?
            .into_first_result()
            .await
            .map_err(|e| AnalyzerError::query(&self.description, e))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let names: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
            let mut catalog_row = CatalogRow::new();
            for (name, data) in names.iter().zip(row.into_iter()) {
                catalog_row.insert(name, render_cell(&data));
            }
            result.push(catalog_row);
        }

        Ok(result)
    }

    async fn query_count(&self, client: &mut MssqlClient, text: &str) -> Result<u64> {
        let row = client
            .simple_query(text)
            .await
            .map_err(|e| AnalyzerError::query(&self.description, e))?
            .into_row()
            .await
            .map_err(|e| AnalyzerError::query(&self.description, e))?;

        let count = match row {
            Some(row) => row
                .try_get::<i32, _>(0)
                .map_err(|e| AnalyzerError::query(&self.description, e))?,
            None => None,
        }
        .ok_or_else(|| AnalyzerError::query(&self.description, "计数查询没有返回结果"))?;

        Ok(count.max(0) as u64)
    }
}

impl CatalogConnector for MssqlConnector {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn fetch(&self, query: CatalogQuery) -> Result<Vec<CatalogRow>> {
        let text = match query {
            CatalogQuery::AllTables => sql::ALL_TABLES,
            CatalogQuery::AllProcedures => sql::ALL_PROCEDURES,
            CatalogQuery::AllColumns => sql::ALL_COLUMNS,
            CatalogQuery::AllConstraintTableUsages => sql::ALL_CONSTRAINT_TABLE_USAGES,
        };

        self.runtime.block_on(async {
            let mut client = self.connect().await?;
            let result = self.query_rows(&mut client, text).await;
            self.close(client).await;

            if let Ok(rows) = &result {
                debug!("{} 读取{}: {} 行", self.description, query, rows.len());
            }
            result
        })
    }

    fn count_tables(&self) -> Result<u64> {
        self.runtime.block_on(async {
            let mut client = self.connect().await?;
            let result = self.query_count(&mut client, sql::COUNT_TABLES).await;
            self.close(client).await;
            result
        })
    }
}

/// 把 TDS 单元格渲染成文本，NULL 返回 None
fn render_cell(data: &ColumnData<'_>) -> Option<String> {
    match data {
        ColumnData::U8(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::I16(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::I32(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::I64(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::F32(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::F64(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::Bit(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::String(v) => v.as_ref().map(|s| s.to_string()),
        ColumnData::Guid(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::Numeric(v) => v.as_ref().map(|v| v.to_string()),
        ColumnData::Binary(v) => v.as_ref().map(|b| format!("{b:02x?}")),
        other => Some(format!("{other:?}")),
    }
}
