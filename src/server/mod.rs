//! HTTP 服务端：接收批次文档并返回执行结果

pub mod routes;
pub mod state;

pub use routes::{DEFAULT_BODY_LIMIT, create_router, create_router_with_body_limit};
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

use crate::Result;
use crate::config::EnsembleConfig;
use crate::engine::Orchestrator;

/// 绑定配置的地址并持续服务，直到收到 Ctrl-C
pub async fn serve(config: &EnsembleConfig) -> Result<()> {
    let orchestrator = Orchestrator::from_config(&config.engine)?;
    let app = create_router_with_body_limit(AppState::new(orchestrator), config.server.body_limit);

    let listener = TcpListener::bind(config.server.addr).await?;
    info!(addr = %listener.local_addr()?, "ensemble listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ensemble stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // 无法注册信号处理，一直运行到进程被终止
        std::future::pending::<()>().await;
    }
}
