//! Error types for the tsmom workspace.
//!
//! Every fallible transform in the signal and volatility engines reports one of
//! these variants. Nothing is silently zero-filled: a missing date or instrument
//! either shrinks the output or surfaces here.

use thiserror::Error;

/// The main error type for tsmom operations.
#[derive(Debug, Error)]
pub enum TsmomError {
    /// A required date, instrument or series is absent.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// A parameter is outside its valid domain (horizon, decay, window, ...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input that cannot be interpreted: duplicate keys, unparseable dates,
    /// unordered indices.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A required column is missing from a frame.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for TsmomError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TsmomError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for tsmom operations.
pub type Result<T> = std::result::Result<T, TsmomError>;
