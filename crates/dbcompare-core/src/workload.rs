//! Workload sizing shared by every backend.

use crate::measurement::Metadata;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECORD_COUNT: u64 = 100_000;
pub const DEFAULT_BATCH_SIZE: u64 = 1000;
pub const DEFAULT_RANDOM_READS: u64 = 10_000;
pub const DEFAULT_UPDATES: u64 = 10_000;
pub const DEFAULT_TRANSACTIONS: u64 = 1000;
pub const DEFAULT_INDEXED_QUERIES: u64 = 1000;
pub const DEFAULT_CONCURRENT_WORKERS: usize = 10;

/// Unit counts for each operation of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Records written by the bulk insert and read back by the sequential scan.
    pub record_count: u64,
    /// Rows per committed transaction during bulk insert.
    pub batch_size: u64,
    pub random_reads: u64,
    pub updates: u64,
    pub transactions: u64,
    pub indexed_queries: u64,
    /// Worker count for the stress phases.
    pub concurrent_workers: usize,
    /// Generator seed; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            record_count: DEFAULT_RECORD_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            random_reads: DEFAULT_RANDOM_READS,
            updates: DEFAULT_UPDATES,
            transactions: DEFAULT_TRANSACTIONS,
            indexed_queries: DEFAULT_INDEXED_QUERIES,
            concurrent_workers: DEFAULT_CONCURRENT_WORKERS,
            seed: None,
        }
    }
}

impl WorkloadConfig {
    /// Replace sizes that cannot be zero with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.batch_size == 0 {
            self.batch_size = DEFAULT_BATCH_SIZE;
        }
        if self.concurrent_workers == 0 {
            self.concurrent_workers = DEFAULT_CONCURRENT_WORKERS;
        }
        self
    }

    /// Describe the sizing for the suite header.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("record_count".to_string(), self.record_count.into());
        metadata.insert("batch_size".to_string(), self.batch_size.into());
        metadata.insert("random_reads".to_string(), self.random_reads.into());
        metadata.insert("updates".to_string(), self.updates.into());
        metadata.insert("transactions".to_string(), self.transactions.into());
        metadata.insert("indexed_queries".to_string(), self.indexed_queries.into());
        metadata.insert(
            "concurrent_workers".to_string(),
            self.concurrent_workers.into(),
        );
        if let Some(seed) = self.seed {
            metadata.insert("seed".to_string(), seed.into());
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MetadataValue;

    #[test]
    fn test_normalized_keeps_empty_dataset() {
        let config = WorkloadConfig {
            record_count: 0,
            batch_size: 0,
            concurrent_workers: 0,
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.record_count, 0);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.concurrent_workers, DEFAULT_CONCURRENT_WORKERS);
    }

    #[test]
    fn test_to_metadata() {
        let config = WorkloadConfig {
            seed: Some(42),
            ..Default::default()
        };
        let metadata = config.to_metadata();
        assert_eq!(metadata.get("record_count"), Some(&MetadataValue::Int(100_000)));
        assert_eq!(metadata.get("seed"), Some(&MetadataValue::Int(42)));
    }
}
