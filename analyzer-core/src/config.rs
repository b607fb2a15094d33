use crate::catalog::{ConnectionTarget, DatabaseKind};
use crate::compare::{ColumnMatching, CompareOptions, FailurePolicy, parse_targets};
use crate::constants::{compare, config};
use crate::error::{AnalyzerError, Result};
use crate::report::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub master: TargetConfig,
    pub division: TargetConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// 单个数据库的连接配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetConfig {
    #[serde(default)]
    pub kind: DatabaseKind,
    pub connection: String,
}

/// 对比相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompareConfig {
    #[serde(default = "default_procedure_owner")]
    pub procedure_owner: String,
    #[serde(default)]
    pub column_matching: ColumnMatching,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// 报告相关配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ReportConfig {
    #[serde(default)]
    pub locale: Locale,
}

fn default_procedure_owner() -> String {
    compare::DEFAULT_PROCEDURE_OWNER.to_string()
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            procedure_owner: default_procedure_owner(),
            column_matching: ColumnMatching::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            master: TargetConfig {
                kind: DatabaseKind::Mssql,
                connection: "Server=tcp:localhost,1433;Database=master_db;User Id=sa;Password=<password>;TrustServerCertificate=true".to_string(),
            },
            division: TargetConfig {
                kind: DatabaseKind::Mssql,
                connection: "Server=tcp:localhost,1433;Database=division_db;User Id=sa;Password=<password>;TrustServerCertificate=true".to_string(),
            },
            compare: CompareConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// 在当前目录查找并加载配置文件
    /// 按优先级查找：db-analyzer.toml -> .db-analyzer.toml
    pub fn find_and_load_config() -> Result<Self> {
        Self::find_in_dir(".")
    }

    /// 在指定目录查找配置文件，都不存在时返回 ConfigNotFound
    pub fn find_in_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        for name in config::CONFIG_SEARCH_NAMES {
            let path = dir.as_ref().join(name);
            if path.exists() {
                tracing::info!("找到配置文件: {}", path.display());
                return Self::load_from_file(&path);
            }
        }

        Err(AnalyzerError::ConfigNotFound)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AnalyzerConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        let values = [
            ("master_kind", self.master.kind.to_string()),
            ("master_connection", toml_string(&self.master.connection)),
            ("division_kind", self.division.kind.to_string()),
            ("division_connection", toml_string(&self.division.connection)),
            ("procedure_owner", toml_string(&self.compare.procedure_owner)),
            (
                "column_matching",
                self.compare.column_matching.as_str().to_string(),
            ),
            (
                "failure_policy",
                self.compare.failure_policy.as_str().to_string(),
            ),
            ("locale", self.report.locale.as_str().to_string()),
        ];

        fill_template(TEMPLATE, &values)
    }

    /// 转换成对比选项，空的 procedure_owner 表示不过滤
    pub fn to_options(&self) -> CompareOptions {
        let owner = self.compare.procedure_owner.trim();
        CompareOptions {
            procedure_owner: (!owner.is_empty()).then(|| owner.to_string()),
            column_matching: self.compare.column_matching,
            failure_policy: self.compare.failure_policy,
        }
    }

    /// 校验并构造两侧连接目标
    pub fn targets(&self) -> Result<(ConnectionTarget, ConnectionTarget)> {
        parse_targets(
            (self.master.kind, &self.master.connection),
            (self.division.kind, &self.division.connection),
        )
    }
}

/// 一次性替换模板中的 `{name}` 占位符，已替换进去的值不会再被扫描
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let placeholder = tail.find('}').and_then(|close| {
            values
                .iter()
                .find(|(name, _)| *name == &tail[1..close])
                .map(|(_, value)| (close, value))
        });

        match placeholder {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// 带引号和转义的 TOML 字符串字面量
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
