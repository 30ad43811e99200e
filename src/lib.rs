pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod table;
pub mod transform;
pub mod validate;

pub use error::ImportError;
pub use table::Table;
pub use transform::{run, PipelineOutput, RunSummary};
