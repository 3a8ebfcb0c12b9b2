//! Core of the dbcompare benchmark harness.
//!
//! This crate defines:
//! - [`BackendAdapter`], the contract each storage backend implements
//! - [`Measurement`] and [`Suite`], the result model handed to reporters
//! - [`stress::run_stress`], the concurrent worker fan-out used by stress phases
//! - [`BenchmarkRunner`], which drives every backend through the catalog
//!
//! Backend crates depend on this crate; reporters only need the result model.

pub mod adapter;
pub mod error;
pub mod measurement;
pub mod operation;
pub mod record;
pub mod runner;
pub mod stress;
pub mod suite;
pub mod workload;

pub use adapter::{log_progress, BackendAdapter, CatalogRun, SkippedOperation, PROGRESS_INTERVAL};
pub use error::BenchError;
pub use measurement::{Measurement, Metadata, MetadataValue, PendingMeasurement};
pub use operation::Operation;
pub use record::Record;
pub use runner::{BackendEntry, BenchmarkRunner};
pub use stress::{
    concurrent_write_id, run_stress, stress_units, StressOutcome, CONCURRENT_WRITE_ID_BASE,
};
pub use suite::{BackendRun, BackendStatus, Suite};
pub use workload::WorkloadConfig;
