//! The collection of measurements produced by one orchestrated run.

use crate::measurement::{duration_nanos, Measurement, Metadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// What happened to a backend during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackendStatus {
    /// The catalog ran; individual operations may still have been skipped.
    Completed,
    /// Dataset preparation failed, nothing was measured.
    SetupFailed { error: String },
    /// The workload sequence aborted.
    ExecuteFailed { error: String },
    /// The run was cancelled before this backend started.
    Cancelled,
}

/// One backend's contribution to a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendRun {
    pub backend: String,
    pub status: BackendStatus,
    /// Number of measurements the backend contributed.
    pub measurements: usize,
}

impl BackendRun {
    pub fn new(backend: impl Into<String>, status: BackendStatus, measurements: usize) -> Self {
        Self {
            backend: backend.into(),
            status,
            measurements,
        }
    }

    pub fn completed(&self) -> bool {
        matches!(self.status, BackendStatus::Completed)
    }
}

/// Measurements from one run, in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    measurements: Vec<Measurement>,
    #[serde(default)]
    backends: Vec<BackendRun>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    #[serde(rename = "duration_ns", with = "duration_nanos")]
    duration: Duration,
    #[serde(default)]
    config: Metadata,
    #[serde(skip)]
    clock: Option<Instant>,
}

impl Suite {
    /// Start a new suite, stamping the start time.
    pub fn begin() -> Self {
        Self {
            measurements: Vec::new(),
            backends: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            duration: Duration::ZERO,
            config: Metadata::new(),
            clock: Some(Instant::now()),
        }
    }

    /// Attach the workload sizing used for this run.
    pub fn with_config(mut self, config: Metadata) -> Self {
        self.config = config;
        self
    }

    /// Append one backend's outcome and its measurements.
    pub fn record(&mut self, run: BackendRun, measurements: Vec<Measurement>) {
        self.backends.push(run);
        self.measurements.extend(measurements);
    }

    /// Stamp the end time and total duration.
    pub fn finish(&mut self) {
        self.ended_at = Some(Utc::now());
        if let Some(clock) = self.clock.take() {
            self.duration = clock.elapsed();
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn backends(&self) -> &[BackendRun] {
        &self.backends
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn config(&self) -> &Metadata {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Backend labels in order of first appearance among the measurements.
    pub fn backend_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for m in &self.measurements {
            if !labels.contains(&m.backend()) {
                labels.push(m.backend());
            }
        }
        labels
    }

    /// Measurements of one backend, in completion order.
    pub fn measurements_for<'a>(&'a self, backend: &'a str) -> impl Iterator<Item = &'a Measurement> + 'a {
        self.measurements.iter().filter(move |m| m.backend() == backend)
    }
}
