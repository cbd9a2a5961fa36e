/// 初始化日志
///
/// 日志始终写到 stderr，stdout 只用于输出格式化结果。
/// 设置 SQLFMT_LOG_FILE 环境变量时改为写入该文件。
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // 根据verbose参数和环境变量确定日志级别
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Ok(log_file) = std::env::var("SQLFMT_LOG_FILE") {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
        {
            Ok(file) => {
                // 输出到文件 - 使用详细格式便于调试
                fmt()
                    .with_env_filter(env_filter)
                    .with_writer(file)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .init();
                return;
            }
            Err(e) => eprintln!("无法打开日志文件 {log_file}: {e}，改为输出到终端"),
        }
    }

    // 输出到终端 - 使用简洁格式
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}
