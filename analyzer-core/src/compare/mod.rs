// 结构对比模块
//
// 六个相互独立的比较器，每个都只依赖目录读取和标识规范化，
// 各自打开/关闭两侧连接并返回自己的结果序列，由 Analyzer 按固定顺序拼接。
//
// 执行顺序：
// 1. 表个数
// 2. 存储过程个数
// 3. 缺少的表
// 4. 缺少的存储过程
// 5. 缺少的列 / 变更的列
// 6. 缺少的键约束

mod columns;
mod constraints;
mod counts;
mod missing;


pub use columns::compare_columns;
pub use constraints::missing_key_constraints;
pub use counts::{compare_sp_count, compare_table_count};
pub use missing::{missing_procedures, missing_tables};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

use crate::catalog::{CatalogConnector, ConnectionTarget, DatabaseKind};
use crate::constants::compare::DEFAULT_PROCEDURE_OWNER;
use crate::error::{AnalyzerError, ErrorKind, Result};
use crate::report::{ComparisonReport, DiffEntry};

/// 变更列的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMatching {
    /// 分库中列标识完全相同的行
    #[default]
    Exact,
    /// 分库签名文本中包含主库列标识文本的行 (兼容旧版行为)
    Substring,
}

impl ColumnMatching {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnMatching::Exact => "exact",
            ColumnMatching::Substring => "substring",
        }
    }
}

/// 比较器失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 任一比较器失败即终止，不返回部分结果
    #[default]
    Abort,
    /// 记录失败并继续执行其余比较器
    Collect,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Collect => "collect",
        }
    }
}

/// 对比选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// 统计存储过程个数时只计该所有者的过程，None 表示不过滤
    pub procedure_owner: Option<String>,
    pub column_matching: ColumnMatching,
    pub failure_policy: FailurePolicy,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            procedure_owner: Some(DEFAULT_PROCEDURE_OWNER.to_string()),
            column_matching: ColumnMatching::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// 比较器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparator {
    TableCount,
    SpCount,
    MissingTables,
    MissingProcedures,
    Columns,
    KeyConstraints,
}

impl Comparator {
    /// 固定的执行顺序
    pub const SEQUENCE: [Comparator; 6] = [
        Comparator::TableCount,
        Comparator::SpCount,
        Comparator::MissingTables,
        Comparator::MissingProcedures,
        Comparator::Columns,
        Comparator::KeyConstraints,
    ];

    pub fn run(
        self,
        master: &dyn CatalogConnector,
        division: &dyn CatalogConnector,
        options: &CompareOptions,
    ) -> Result<Vec<DiffEntry>> {
        match self {
            Comparator::TableCount => Ok(vec![compare_table_count(master, division)?]),
            Comparator::SpCount => Ok(vec![compare_sp_count(
                master,
                division,
                options.procedure_owner.as_deref(),
            )?]),
            Comparator::MissingTables => missing_tables(master, division),
            Comparator::MissingProcedures => missing_procedures(master, division),
            Comparator::Columns => compare_columns(master, division, options.column_matching),
            Comparator::KeyConstraints => missing_key_constraints(master, division),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Comparator::TableCount => "统计表个数",
            Comparator::SpCount => "统计存储过程个数",
            Comparator::MissingTables => "查找缺少的表",
            Comparator::MissingProcedures => "查找缺少的存储过程",
            Comparator::Columns => "查找缺少的列和变更的列",
            Comparator::KeyConstraints => "查找缺少的键约束",
        };
        f.write_str(name)
    }
}

/// collect 模式下记录的比较器失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparatorFailure {
    pub comparator: Comparator,
    pub kind: ErrorKind,
    pub message: String,
}

/// 主库/分库结构分析器
pub struct Analyzer<'a> {
    master: &'a dyn CatalogConnector,
    division: &'a dyn CatalogConnector,
    options: CompareOptions,
}

impl<'a> Analyzer<'a> {
    pub fn new(master: &'a dyn CatalogConnector, division: &'a dyn CatalogConnector) -> Self {
        Self::with_options(master, division, CompareOptions::default())
    }

    pub fn with_options(
        master: &'a dyn CatalogConnector,
        division: &'a dyn CatalogConnector,
        options: CompareOptions,
    ) -> Self {
        Self {
            master,
            division,
            options,
        }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// 按固定顺序执行全部比较器并拼接结果
    pub fn analyze(&self) -> Result<ComparisonReport> {
        info!(
            "📋 开始分析数据库: 主库 {} / 分库 {}",
            self.master.describe(),
            self.division.describe()
        );

        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for comparator in Comparator::SEQUENCE {
            info!("🔍 {}...", comparator);
            match comparator.run(self.master, self.division, &self.options) {
                Ok(found) => {
                    info!("   ✅ {}: {} 条结果", comparator, found.len());
                    entries.extend(found);
                }
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Abort => {
                        error!("   ❌ {}失败: {}", comparator, e);
                        return Err(e);
                    }
                    FailurePolicy::Collect => {
                        warn!("   ⚠️  {}失败，继续执行: {}", comparator, e);
                        failures.push(ComparatorFailure {
                            comparator,
                            kind: e.kind(),
                            message: e.to_string(),
                        });
                    }
                },
            }
        }

        info!("🎉 分析完成，共 {} 条结果", entries.len());
        Ok(ComparisonReport::with_failures(entries, failures))
    }
}

/// 从两个连接目标直接执行分析
pub fn analyze_targets(
    master: &ConnectionTarget,
    division: &ConnectionTarget,
    options: CompareOptions,
) -> Result<ComparisonReport> {
    let master_connector = master.connector()?;
    let division_connector = division.connector()?;
    Analyzer::with_options(master_connector.as_ref(), division_connector.as_ref(), options)
        .analyze()
}

/// 把连接串直接构造成连接目标，空串或格式错误时在任何比较器运行前失败
pub fn parse_targets(
    master: (DatabaseKind, &str),
    division: (DatabaseKind, &str),
) -> Result<(ConnectionTarget, ConnectionTarget)> {
    let master = ConnectionTarget::new(master.0, master.1).map_err(|e| label_side("主数据库", e))?;
    let division =
        ConnectionTarget::new(division.0, division.1).map_err(|e| label_side("分数据库", e))?;
    Ok((master, division))
}

fn label_side(side: &str, err: AnalyzerError) -> AnalyzerError {
    match err {
        AnalyzerError::InvalidConnectionTarget(msg) => {
            AnalyzerError::invalid_target(format!("{side}: {msg}"))
        }
        other => other,
    }
}
