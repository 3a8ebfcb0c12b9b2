//! Error types for the PostgreSQL backend.

use dbcompare_core::BenchError;
use thiserror::Error;

/// Errors that can occur while benchmarking PostgreSQL.
#[derive(Error, Debug)]
pub enum PostgreSQLBenchError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// The adapter has no open connection.
    #[error("Not connected")]
    NotConnected,

    /// The table holds no records for an operation that looks keys up.
    #[error("No records in table for {0}")]
    EmptyDataset(String),
}

impl From<PostgreSQLBenchError> for BenchError {
    fn from(err: PostgreSQLBenchError) -> Self {
        BenchError::backend("PostgreSQL", err)
    }
}
