//! Error types for result reporters.

use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
