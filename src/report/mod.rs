pub mod reporter;
pub mod summary;

pub use reporter::BatchReporter;
pub use summary::BatchSummary;
