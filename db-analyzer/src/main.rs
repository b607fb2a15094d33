use analyzer_core::AnalyzerError;
use clap::Parser;
use db_analyzer::{Cli, CliApp, Commands, run_init, setup_logging};
use tracing::{debug, error};

// SQL Server 连接器自带单线程运行时，这里保持同步入口
fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);
    debug!("{}", db_analyzer::project_info::get_version_string());

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(force) {
            error!("❌ 初始化失败: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // 命令行给出两侧连接串且未指定配置文件时直接运行
    let direct = match (&cli.config, &cli.command) {
        (None, Commands::Compare(args)) => CliApp::from_compare_args(args),
        _ => None,
    };

    let app = match direct {
        Some(app) => app,
        None => match CliApp::new_with_auto_config(cli.config.as_deref()) {
            Ok(app) => app,
            Err(AnalyzerError::ConfigNotFound) => {
                error!("❌ 配置文件未找到。");
                error!("👉 请先运行 'db-analyzer init' 命令来创建配置文件，或同时指定 --master 和 --division。");
                std::process::exit(1);
            }
            Err(e) => {
                error!("❌ 应用初始化失败: {}", e);
                std::process::exit(1);
            }
        },
    };

    // 运行命令
    match app.run_command(cli.command) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            if e.chain().any(|cause| {
                matches!(
                    cause.downcast_ref::<AnalyzerError>(),
                    Some(AnalyzerError::InvalidConnectionTarget(_))
                )
            }) {
                error!("❌ 连接目标无效: {}", e);
            } else {
                error!("❌ 分析失败: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}
