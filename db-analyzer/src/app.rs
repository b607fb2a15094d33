use analyzer_core::config::{AnalyzerConfig, TargetConfig};
use analyzer_core::error::Result;
use std::path::Path;

use crate::cli::{CompareArgs, Commands};
use crate::commands::{self, CommandOutcome};
use crate::init::run_init;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CliApp {
    pub config: AnalyzerConfig,
}

impl CliApp {
    /// 使用配置文件初始化CLI应用
    ///
    /// 指定路径时直接加载，否则按默认文件名查找
    pub fn new_with_auto_config(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                info!("使用配置文件: {}", path.display());
                AnalyzerConfig::load_from_file(path)?
            }
            None => AnalyzerConfig::find_and_load_config()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// 命令行同时给出两侧连接串时不需要配置文件
    pub fn from_compare_args(args: &CompareArgs) -> Option<Self> {
        let (master, division) = (args.master.as_ref()?, args.division.as_ref()?);
        let config = AnalyzerConfig {
            master: TargetConfig {
                kind: Default::default(),
                connection: master.clone(),
            },
            division: TargetConfig {
                kind: Default::default(),
                connection: division.clone(),
            },
            compare: Default::default(),
            report: Default::default(),
        };
        Some(Self { config })
    }

    /// 运行应用命令
    pub fn run_command(&self, command: Commands) -> anyhow::Result<CommandOutcome> {
        match command {
            Commands::Init { force } => {
                run_init(force)?;
                Ok(CommandOutcome::Success)
            }
            Commands::Compare(args) => commands::run_compare(self, &args),
        }
    }

    /// 把命令行参数覆盖到配置上
    pub fn effective_config(&self, args: &CompareArgs) -> AnalyzerConfig {
        let mut config = self.config.clone();

        if let Some(master) = &args.master {
            config.master.connection = master.clone();
        }
        if let Some(division) = &args.division {
            config.division.connection = division.clone();
        }
        if let Some(kind) = args.kind {
            config.master.kind = kind;
            config.division.kind = kind;
        }
        if let Some(kind) = args.master_kind {
            config.master.kind = kind;
        }
        if let Some(kind) = args.division_kind {
            config.division.kind = kind;
        }
        if let Some(owner) = &args.procedure_owner {
            config.compare.procedure_owner = owner.clone();
        }
        if let Some(locale) = args.locale {
            config.report.locale = locale;
        }

        config
    }
}
