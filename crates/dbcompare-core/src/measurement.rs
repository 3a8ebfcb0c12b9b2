//! Measurement of one workload operation against one backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Open key/value metadata attached to measurements and suites.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A primitive metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Int(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        MetadataValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

/// The completed outcome of one operation against one backend.
///
/// Instances only come out of [`PendingMeasurement::complete`] or
/// [`Measurement::recorded`] and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    operation: String,
    backend: String,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    #[serde(rename = "duration_ns", with = "duration_nanos")]
    duration: Duration,
    records_count: u64,
    error_count: u64,
    error_rate: Option<f64>,
    throughput: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: Metadata,
}

/// A measurement whose operation is still running.
#[derive(Debug)]
pub struct PendingMeasurement {
    operation: String,
    backend: String,
    records_count: u64,
    started_at: DateTime<Utc>,
    clock: Instant,
    metadata: Metadata,
}

impl Measurement {
    /// Start timing an operation that will attempt `records_count` units.
    pub fn start(
        operation: impl Into<String>,
        backend: impl Into<String>,
        records_count: u64,
    ) -> PendingMeasurement {
        PendingMeasurement {
            operation: operation.into(),
            backend: backend.into(),
            records_count,
            started_at: Utc::now(),
            clock: Instant::now(),
            metadata: Metadata::new(),
        }
    }

    /// Build an already completed measurement from known parts.
    pub fn recorded(
        operation: impl Into<String>,
        backend: impl Into<String>,
        records_count: u64,
        error_count: u64,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let ended_at = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|elapsed| started_at.checked_add_signed(elapsed))
            .unwrap_or(started_at);
        let (error_rate, throughput) = derive_rates(records_count, error_count, duration);
        Self {
            operation: operation.into(),
            backend: backend.into(),
            started_at,
            ended_at,
            duration,
            records_count,
            error_count,
            error_rate,
            throughput,
            metadata: Metadata::new(),
        }
    }

    /// Attach metadata to a recorded measurement.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn records_count(&self) -> u64 {
        self.records_count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Fraction of failed units in `[0, 1]`, `None` when nothing was attempted.
    pub fn error_rate(&self) -> Option<f64> {
        self.error_rate
    }

    /// Units per second, `None` when nothing was attempted or no time elapsed.
    pub fn throughput(&self) -> Option<f64> {
        self.throughput
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl PendingMeasurement {
    /// Attach metadata before the operation completes.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert_metadata(key, value);
        self
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn records_count(&self) -> u64 {
        self.records_count
    }

    /// Stamp the end time and compute the derived rates.
    pub fn complete(self, error_count: u64) -> Measurement {
        let duration = self.clock.elapsed();
        let (error_rate, throughput) = derive_rates(self.records_count, error_count, duration);
        Measurement {
            operation: self.operation,
            backend: self.backend,
            started_at: self.started_at,
            ended_at: Utc::now(),
            duration,
            records_count: self.records_count,
            error_count,
            error_rate,
            throughput,
            metadata: self.metadata,
        }
    }
}

fn derive_rates(records: u64, errors: u64, duration: Duration) -> (Option<f64>, Option<f64>) {
    if records == 0 {
        return (None, None);
    }
    let error_rate = errors.min(records) as f64 / records as f64;
    let secs = duration.as_secs_f64();
    let throughput = if secs > 0.0 {
        Some(records as f64 / secs)
    } else {
        None
    };
    (Some(error_rate), throughput)
}

/// Serialize a `Duration` as integer nanoseconds.
pub(crate) mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
