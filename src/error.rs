//! Error types for iris-eda
//!
//! Every failure carries enough context to say which column or stage broke.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// iris-eda error types
#[derive(Error, Debug)]
pub enum Error {
    /// Embedded dataset could not be parsed
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Requested column is not part of the table schema
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column exists but has an unexpected Arrow type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Expected Arrow type
        expected: String,
        /// Actual Arrow type
        found: String,
    },

    /// Invalid argument or configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (Arrow record batch construction)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Chart rendering or terminal setup failed
    #[error("Render error: {0}")]
    Render(String),

    /// User aborted while a chart was displayed
    #[error("Interrupted by user")]
    Interrupted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
