pub mod compose;
pub mod response;
pub mod types;

pub use compose::{ComposeError, Composition};
pub use response::{BatchResult, Response, ResponseObject};
pub use types::{CallSpec, Dependency, Request, Workload};
