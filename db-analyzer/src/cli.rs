use crate::project_info::{metadata, version_info};
use analyzer_core::DatabaseKind;
use analyzer_core::Locale;
use analyzer_core::constants::report::DEFAULT_TEXT_FILE_NAME;
use analyzer_core::export::ExportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "db-analyzer")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径，不指定时按 db-analyzer.toml -> .db-analyzer.toml 查找
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 生成配置文件模板
    Init {
        /// 覆盖已存在的配置文件
        #[arg(long)]
        force: bool,
    },
    /// 对比主数据库与分数据库的结构
    Compare(CompareArgs),
}

/// compare 命令参数，均覆盖配置文件中的对应项
#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    /// 主数据库连接串 (SQL Server ADO 连接串或 DuckDB 文件路径)
    #[arg(long, env = "DB_ANALYZER_MASTER")]
    pub master: Option<String>,

    /// 分数据库连接串
    #[arg(long, env = "DB_ANALYZER_DIVISION")]
    pub division: Option<String>,

    /// 两侧共用的数据库类型: mssql | duckdb
    #[arg(long)]
    pub kind: Option<DatabaseKind>,

    /// 主数据库类型，优先于 --kind
    #[arg(long)]
    pub master_kind: Option<DatabaseKind>,

    /// 分数据库类型，优先于 --kind
    #[arg(long)]
    pub division_kind: Option<DatabaseKind>,

    /// 统计存储过程个数时的所有者，空字符串表示不过滤
    #[arg(long)]
    pub procedure_owner: Option<String>,

    /// 报告语言: zh | en
    #[arg(long)]
    pub locale: Option<Locale>,

    /// 导出报告到文件，不带值时使用默认文件名
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_TEXT_FILE_NAME)]
    pub output: Option<PathBuf>,

    /// 导出格式: text | json
    #[arg(long, default_value = "text")]
    pub format: ExportFormat,

    /// 存在差异时以退出码 3 结束
    #[arg(long)]
    pub fail_on_drift: bool,
}
