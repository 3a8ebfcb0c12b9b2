//! JSON export of the whole suite.

use crate::error::ReportError;
use crate::Reporter;
use dbcompare_core::Suite;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the serialized suite to `<directory>/<prefix>_<YYYYMMDD_HHMMSS>.json`.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    directory: PathBuf,
    prefix: String,
}

impl JsonReporter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, suite: &Suite) -> PathBuf {
        self.directory.join(format!(
            "{}_{}.json",
            self.prefix,
            suite.started_at().format("%Y%m%d_%H%M%S")
        ))
    }

    pub fn write_to(&self, suite: &Suite, path: &Path) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, suite)?;
        writer.flush()?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn name(&self) -> &str {
        "json"
    }

    fn generate(&self, suite: &Suite) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(suite);
        self.write_to(suite, &path)?;
        info!("JSON report written to {}", path.display());
        Ok(())
    }
}

/// Load a suite previously written by [`JsonReporter`].
pub fn load_suite(path: &Path) -> Result<Suite, ReportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dbcompare_core::{BackendRun, BackendStatus, Measurement};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_written_suite_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path(), "dbcompare");

        let mut suite = Suite::begin();
        suite.record(
            BackendRun::new("SurrealDB", BackendStatus::Completed, 1),
            vec![Measurement::recorded(
                "Concurrent Writes",
                "SurrealDB",
                500,
                3,
                Utc::now(),
                Duration::from_millis(1250),
            )
            .with_metadata("workers", 10usize)],
        );
        suite.record(
            BackendRun::new("PostgreSQL", BackendStatus::Cancelled, 0),
            Vec::new(),
        );
        suite.finish();

        reporter.generate(&suite).unwrap();
        let loaded = load_suite(&reporter.path_for(&suite)).unwrap();

        assert_eq!(loaded.measurements().len(), 1);
        let m = &loaded.measurements()[0];
        assert_eq!(m.operation(), "Concurrent Writes");
        assert_eq!(m.duration(), Duration::from_millis(1250));
        assert_eq!(m.error_count(), 3);
        assert_eq!(m.throughput(), Some(400.0));
        assert_eq!(loaded.backends().len(), 2);
        assert_eq!(loaded.backends()[1].status, BackendStatus::Cancelled);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_suite(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
