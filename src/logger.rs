use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志
///
/// 日志级别取自 `RUST_LOG`，默认 `info`，例如：
/// - RUST_LOG=debug ensemble serve
/// - RUST_LOG=ensemble::engine=trace ensemble run batch.json
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logger initialized");
}
