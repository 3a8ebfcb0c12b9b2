//! PostgreSQL backend for dbcompare.
//!
//! Implements the full operation catalog over a single `tokio-postgres`
//! connection. Records live in the `benchmark_records` table, which is
//! dropped and recreated on every run.

pub mod adapter;
pub mod error;
mod operations;
pub mod schema;
pub mod settings;

pub use adapter::PostgreSQLAdapter;
pub use error::PostgreSQLBenchError;
pub use schema::{AgeGroup, TableStats, TABLE_NAME};
pub use settings::PostgreSQLSettings;
