//! Error types for the SurrealDB backend.

use dbcompare_core::{BenchError, Operation};
use thiserror::Error;

/// Errors that can occur while benchmarking SurrealDB.
#[derive(Error, Debug)]
pub enum SurrealBenchError {
    /// Query or transport error reported by the SDK.
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// Connection could not be established.
    #[error("Connection error: {0}")]
    Connection(#[from] anyhow::Error),

    /// The adapter has no open connection.
    #[error("Not connected")]
    NotConnected,

    /// The operation is not part of the SurrealDB catalog.
    #[error("{0} is not supported by SurrealDB")]
    Unsupported(Operation),

    /// The table holds no records for an operation that looks keys up.
    #[error("No records in table for {0}")]
    EmptyDataset(String),
}

impl From<SurrealBenchError> for BenchError {
    fn from(err: SurrealBenchError) -> Self {
        BenchError::backend("SurrealDB", err)
    }
}
