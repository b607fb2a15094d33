/// 日志文件路径的环境变量
pub const LOG_FILE_ENV: &str = "DB_ANALYZER_LOG_FILE";

/// 设置日志记录系统
///
/// - 库代码只使用 tracing 宏记录日志，在应用入口配置输出
/// - 支持 RUST_LOG 环境变量控制日志级别
/// - 设置 DB_ANALYZER_LOG_FILE 时追加写入文件，使用详细格式
/// - 否则输出到 stderr，简洁格式
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_file = std::env::var(LOG_FILE_ENV).ok().and_then(|path| {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("无法打开日志文件 {path}: {e}，改为输出到终端");
                None
            }
        }
    });

    if let Some(file) = log_file {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_line_number(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .without_time()
            .compact()
            .init();
    }
}
