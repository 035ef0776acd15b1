pub mod client;
pub mod headers;
pub mod request;
pub mod response;
pub mod types;

use async_trait::async_trait;

// Re-export commonly used types for convenient access
pub use client::Client;
pub use request::Call;
pub use response::Reply;
pub use types::{Method, Status};

/// 执行单次出站调用
///
/// [`Client`] 是基于 HTTP 的实现，引擎只依赖该 trait。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, call: Call) -> crate::Result<Reply>;
}
