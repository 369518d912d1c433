//! Error types for map and table output.

use thiserror::Error;

/// Result type for presentation operations.
pub type MapResult<T> = Result<T, MapError>;

#[derive(Error, Debug)]
pub enum MapError {
    /// GeoJSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
