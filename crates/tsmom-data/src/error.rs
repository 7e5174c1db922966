//! Error types for loading and storing tables.

use thiserror::Error;
use tsmom_traits::TsmomError;

/// Errors that can occur when reading or writing tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// File system access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but its content is not a valid table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A core table invariant was violated.
    #[error(transparent)]
    Core(#[from] TsmomError),
}
