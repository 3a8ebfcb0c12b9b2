//! Benchmark orchestration across backends.

use crate::adapter::BackendAdapter;
use crate::error::BenchError;
use crate::measurement::Metadata;
use crate::suite::{BackendRun, BackendStatus, Suite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A backend registered with the runner under its configuration key.
pub struct BackendEntry {
    key: String,
    adapter: Box<dyn BackendAdapter>,
}

impl BackendEntry {
    pub fn new(key: impl Into<String>, adapter: Box<dyn BackendAdapter>) -> Self {
        Self {
            key: key.into(),
            adapter,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.adapter.name()
    }

    /// Whether a `--db` style filter selects this backend.
    pub fn matches(&self, filter: &str) -> bool {
        self.key.eq_ignore_ascii_case(filter) || self.adapter.name().eq_ignore_ascii_case(filter)
    }
}

/// Runs every registered backend through prepare, execute and release.
///
/// Backends run one after another in registration order. Failures stay
/// local to the backend that caused them.
pub struct BenchmarkRunner {
    entries: Vec<BackendEntry>,
    cancel: CancellationToken,
    config: Metadata,
}

impl BenchmarkRunner {
    /// Create a runner. Fails when no backend is available.
    pub fn new(entries: Vec<BackendEntry>) -> Result<Self, BenchError> {
        if entries.is_empty() {
            return Err(BenchError::NoBackends);
        }
        Ok(Self {
            entries,
            cancel: CancellationToken::new(),
            config: Metadata::new(),
        })
    }

    /// Use an external token; cancellation is observed between backends.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Workload description copied into every suite.
    pub fn with_config(mut self, config: Metadata) -> Self {
        self.config = config;
        self
    }

    /// Registered backend labels, in run order.
    pub fn backends(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Run all backends, or only the one selected by `filter`.
    pub async fn run(&mut self, filter: Option<&str>) -> Suite {
        let mut suite = Suite::begin().with_config(self.config.clone());

        if let Some(filter) = filter {
            if !self.entries.iter().any(|e| e.matches(filter)) {
                warn!(
                    "No backend matches '{}' (available: {})",
                    filter,
                    self.backends().join(", ")
                );
            }
        }

        for entry in self.entries.iter_mut() {
            if let Some(filter) = filter {
                if !entry.matches(filter) {
                    debug!("Skipping {} (filtered out)", entry.name());
                    continue;
                }
            }

            let name = entry.name().to_string();
            if self.cancel.is_cancelled() {
                warn!("Run cancelled, not starting {}", name);
                suite.record(BackendRun::new(name, BackendStatus::Cancelled, 0), Vec::new());
                continue;
            }

            info!("Running benchmarks for {}", name);
            let adapter = &mut entry.adapter;

            if let Err(e) = adapter.prepare().await {
                warn!("Setup failed for {}: {}", name, e);
                release(adapter.as_mut(), &name).await;
                suite.record(
                    BackendRun::new(
                        name,
                        BackendStatus::SetupFailed {
                            error: e.to_string(),
                        },
                        0,
                    ),
                    Vec::new(),
                );
                continue;
            }

            let (status, measurements) = match adapter.execute().await {
                Ok(measurements) => (BackendStatus::Completed, measurements),
                Err(e) => {
                    warn!("Benchmark run failed for {}: {}", name, e);
                    (
                        BackendStatus::ExecuteFailed {
                            error: e.to_string(),
                        },
                        Vec::new(),
                    )
                }
            };

            release(adapter.as_mut(), &name).await;

            info!("{} finished with {} measurements", name, measurements.len());
            let count = measurements.len();
            suite.record(BackendRun::new(name, status, count), measurements);
        }

        suite.finish();
        info!(
            "Benchmark suite completed in {:?} ({} measurements)",
            suite.duration(),
            suite.measurements().len()
        );
        suite
    }
}

async fn release(adapter: &mut dyn BackendAdapter, name: &str) {
    if let Err(e) = adapter.release().await {
        warn!("Teardown failed for {}: {}", name, e);
    }
}
