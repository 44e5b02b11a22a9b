//! Error types for the Datalens library.

use thiserror::Error;

/// Main error type for Datalens operations.
///
/// Malformed *data* never produces an error; these variants cover invalid
/// configuration, column-addressed lookups and cancelled passes.
#[derive(Debug, Error)]
pub enum DatalensError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A named column does not exist in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric operation was requested on a non-numeric column.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// A profiling pass was cancelled before it completed.
    #[error("Profiling cancelled at {stage}")]
    Cancelled { stage: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Datalens operations.
pub type Result<T> = std::result::Result<T, DatalensError>;
