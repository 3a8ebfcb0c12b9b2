//! Error types for benchmark orchestration.

use thiserror::Error;

/// Errors surfaced by backend adapters and the benchmark runner.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The runner was constructed without any backend.
    #[error("No benchmark backends available")]
    NoBackends,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Preparing the benchmark dataset failed.
    #[error("Setup error: {0}")]
    Setup(String),

    /// Backend-specific failure.
    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },

    /// Releasing the backend connection failed.
    #[error("Teardown error: {0}")]
    Teardown(String),
}

impl BenchError {
    /// Build a backend-specific error.
    pub fn backend(backend: impl Into<String>, message: impl ToString) -> Self {
        BenchError::Backend {
            backend: backend.into(),
            message: message.to_string(),
        }
    }
}
