use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that stop a run. Per-row data problems never surface here.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("failed to read CSV {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
