//! The contract every storage backend implements.

use crate::error::BenchError;
use crate::measurement::Measurement;
use crate::operation::Operation;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info, warn};

/// Units between two progress log lines.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// A storage backend driven through the workload catalog.
#[async_trait]
pub trait BackendAdapter: Send {
    /// Stable display name used as the backend label.
    fn name(&self) -> &str;

    /// Create or reset the benchmark dataset container.
    ///
    /// Must succeed when the container does not exist yet.
    async fn prepare(&mut self) -> Result<(), BenchError>;

    /// Run the operation catalog and return one measurement per operation
    /// that started.
    async fn execute(&mut self) -> Result<Vec<Measurement>, BenchError>;

    /// Close the connection.
    async fn release(&mut self) -> Result<(), BenchError>;
}

/// An operation that failed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub operation: Operation,
    pub reason: String,
}

/// Collects per-operation results while an adapter walks its catalog.
#[derive(Debug)]
pub struct CatalogRun {
    backend: String,
    measurements: Vec<Measurement>,
    skipped: Vec<SkippedOperation>,
}

impl CatalogRun {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            measurements: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Keep a completed measurement, or log and remember why it never started.
    pub fn record<E: fmt::Display>(&mut self, operation: Operation, result: Result<Measurement, E>) {
        match result {
            Ok(measurement) => {
                log_completion(&measurement);
                self.measurements.push(measurement);
            }
            Err(e) => {
                warn!("{} {} failed to start: {}", self.backend, operation, e);
                self.skipped.push(SkippedOperation {
                    operation,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn skipped(&self) -> &[SkippedOperation] {
        &self.skipped
    }

    pub fn finish(self) -> Vec<Measurement> {
        if !self.skipped.is_empty() {
            info!(
                "{}: {} operations completed, {} skipped",
                self.backend,
                self.measurements.len(),
                self.skipped.len()
            );
        }
        self.measurements
    }
}

/// Log progress every [`PROGRESS_INTERVAL`] units.
pub fn log_progress(operation: Operation, current: u64, total: u64) {
    if current > 0 && current % PROGRESS_INTERVAL == 0 {
        debug!("{}: {}/{} completed", operation, current, total);
    }
}

fn log_completion(m: &Measurement) {
    info!(
        "{} {}: {} records in {:?} ({:.2} ops/sec, {} errors, {:.2}%)",
        m.backend(),
        m.operation(),
        m.records_count(),
        m.duration(),
        m.throughput().unwrap_or(0.0),
        m.error_count(),
        m.error_rate().unwrap_or(0.0) * 100.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_catalog_run_omits_operations_that_did_not_start() {
        let mut run = CatalogRun::new("Alpha");
        run.record::<BenchError>(
            Operation::BulkWrite,
            Ok(Measurement::recorded(
                Operation::BulkWrite.label(),
                "Alpha",
                100,
                0,
                Utc::now(),
                Duration::from_millis(100),
            )),
        );
        run.record(
            Operation::PointLookup,
            Err(BenchError::backend("Alpha", "no records to look up")),
        );

        assert_eq!(run.skipped().len(), 1);
        assert_eq!(run.skipped()[0].operation, Operation::PointLookup);

        let measurements = run.finish();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].operation(), "Bulk Insert");
    }
}
