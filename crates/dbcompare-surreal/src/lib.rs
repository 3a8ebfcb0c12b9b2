//! SurrealDB backend for dbcompare.
//!
//! Records are stored in the `test_records` table with explicit numeric ids.
//! Works against a remote server over WebSocket or the in-process `mem://`
//! engine.

pub mod adapter;
pub mod connect;
pub mod error;
pub mod settings;

pub use adapter::{count_records, SurrealAdapter, SurrealRecord, SURREAL_CATALOG, TABLE_NAME};
pub use connect::{surreal_connect, surreal_connect_with_retries};
pub use error::SurrealBenchError;
pub use settings::SurrealSettings;
