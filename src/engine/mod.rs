pub mod dependency;
pub mod executor;
pub mod orchestrator;

pub use dependency::{DependencyResolver, Resolution, Resolved};
pub use executor::RequestExecutor;
pub use orchestrator::{DEFAULT_BATCH_TIMEOUT, Orchestrator};

use tokio_util::sync::CancellationToken;

use crate::http::{Call, Reply, Transport};
use crate::{EnsembleError, Result};

/// 发送 `call`，`cancel` 触发时立即放弃
pub(crate) async fn dispatch(
    transport: &dyn Transport,
    call: Call,
    cancel: &CancellationToken,
) -> Result<Reply> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EnsembleError::Cancelled),
        reply = transport.send(call) => reply,
    }
}
