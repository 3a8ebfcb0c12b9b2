//! Concurrent stress phases.
//!
//! Workers run independently against a shared client. Each worker counts its
//! own failures and sends a single report when it finishes; the caller only
//! reads the reports after every worker has terminated.

use std::fmt;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// First record id used by concurrent write workers.
///
/// Ids are unique within one phase but nothing reserves this range on the
/// backend, so a dataset larger than the base can collide with it.
pub const CONCURRENT_WRITE_ID_BASE: i64 = 200_000;

/// Record id written by `worker` for its `unit`-th insert.
pub fn concurrent_write_id(worker: usize, units_per_worker: u64, unit: u64) -> i64 {
    let offset = stress_units(worker, units_per_worker).saturating_add(unit);
    CONCURRENT_WRITE_ID_BASE.saturating_add(i64::try_from(offset).unwrap_or(i64::MAX))
}

/// Units attempted by a stress phase, saturating instead of overflowing.
pub fn stress_units(workers: usize, units_per_worker: u64) -> u64 {
    (workers as u64).saturating_mul(units_per_worker)
}

/// Aggregated result of one stress phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StressOutcome {
    /// Always `workers * units_per_worker`.
    pub attempted: u64,
    pub errors: u64,
    /// First failure message received, kept for logging.
    pub first_error: Option<String>,
}

#[derive(Debug)]
struct WorkerReport {
    worker: usize,
    attempted: u64,
    errors: u64,
    first_error: Option<String>,
}

/// Run `workers` concurrent tasks, each performing `units_per_worker` units.
///
/// `make_worker` is called once per worker index and returns the unit
/// function for that worker, so per-worker state (a forked generator, cloned
/// statements) lives inside it. A worker that panics has all of its units
/// counted as failed.
pub async fn run_stress<W, F, Fut, E>(
    workers: usize,
    units_per_worker: u64,
    mut make_worker: W,
) -> StressOutcome
where
    W: FnMut(usize) -> F,
    F: FnMut(u64) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<WorkerReport>(workers.max(1));
    let mut tasks = JoinSet::new();

    for worker in 0..workers {
        let tx = tx.clone();
        let mut unit = make_worker(worker);
        tasks.spawn(async move {
            let mut report = WorkerReport {
                worker,
                attempted: 0,
                errors: 0,
                first_error: None,
            };
            for j in 0..units_per_worker {
                report.attempted += 1;
                if let Err(e) = unit(j).await {
                    report.errors += 1;
                    if report.first_error.is_none() {
                        report.first_error = Some(e.to_string());
                    }
                }
            }
            // Capacity equals the worker count, so this send never waits.
            let _ = tx.send(report).await;
        });
    }
    drop(tx);

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Stress worker terminated abnormally: {}", e);
        }
    }

    let mut outcome = StressOutcome::default();
    let mut reported = vec![false; workers];
    while let Some(report) = rx.recv().await {
        debug!(
            "Worker {} finished: {} units, {} errors",
            report.worker, report.attempted, report.errors
        );
        reported[report.worker] = true;
        outcome.attempted += report.attempted;
        outcome.errors += report.errors;
        if outcome.first_error.is_none() {
            outcome.first_error = report.first_error;
        }
    }

    for (worker, done) in reported.into_iter().enumerate() {
        if !done {
            outcome.attempted = outcome.attempted.saturating_add(units_per_worker);
            outcome.errors = outcome.errors.saturating_add(units_per_worker);
            if outcome.first_error.is_none() {
                outcome.first_error = Some(format!("worker {worker} panicked"));
            }
        }
    }

    outcome
}
