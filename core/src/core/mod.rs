pub mod context_data;
pub mod control;
pub mod executor;
pub mod log;

// Re-export key types for easier access from other modules (and lib.rs)
pub use context_data::ContextData;
pub use control::{BranchOutcome, RunOutcome};
pub use executor::{ActionExecutor, Operation, RenderedTemplates};
pub use log::{LogEntry, LogEvent, LogStep};
