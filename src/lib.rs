pub mod config;
pub mod engine;
pub mod error;
pub mod guide;
pub mod http;
pub mod logger;
pub mod report;
pub mod server;
pub mod workload;

// Re-export commonly used types
pub use engine::Orchestrator;
pub use error::{EnsembleError, Result};
pub use workload::{BatchResult, CallSpec, Dependency, Request, Response, Workload};
