//! CSV export, one row per measurement.

use crate::error::ReportError;
use crate::Reporter;
use dbcompare_core::{Measurement, Suite};
use std::path::{Path, PathBuf};
use tracing::info;

const HEADER: [&str; 9] = [
    "Database",
    "Operation",
    "Duration (ms)",
    "Records Count",
    "Throughput (ops/s)",
    "Error Count",
    "Error Rate (%)",
    "Start Time",
    "End Time",
];

/// Writes `<directory>/<prefix>_<YYYYMMDD_HHMMSS>.csv`.
#[derive(Debug, Clone)]
pub struct CsvReporter {
    directory: PathBuf,
    prefix: String,
}

impl CsvReporter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Output file for a suite, stamped with the suite start time.
    pub fn path_for(&self, suite: &Suite) -> PathBuf {
        self.directory.join(format!(
            "{}_{}.csv",
            self.prefix,
            suite.started_at().format("%Y%m%d_%H%M%S")
        ))
    }

    /// Write the suite to an explicit path.
    pub fn write_to(&self, suite: &Suite, path: &Path) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        for m in suite.measurements() {
            writer.write_record(row(m))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Reporter for CsvReporter {
    fn name(&self) -> &str {
        "csv"
    }

    fn generate(&self, suite: &Suite) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(suite);
        self.write_to(suite, &path)?;
        info!("CSV report written to {}", path.display());
        Ok(())
    }
}

// Undefined rates are written as empty cells.
fn row(m: &Measurement) -> [String; 9] {
    [
        m.backend().to_string(),
        m.operation().to_string(),
        format!("{:.3}", m.duration().as_secs_f64() * 1000.0),
        m.records_count().to_string(),
        m.throughput().map(|t| format!("{t:.2}")).unwrap_or_default(),
        m.error_count().to_string(),
        m.error_rate()
            .map(|r| format!("{:.2}", r * 100.0))
            .unwrap_or_default(),
        m.started_at().to_rfc3339(),
        m.ended_at().to_rfc3339(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dbcompare_core::{BackendRun, BackendStatus};
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_suite() -> Suite {
        let mut suite = Suite::begin();
        suite.record(
            BackendRun::new("PostgreSQL", BackendStatus::Completed, 2),
            vec![
                Measurement::recorded("Bulk Insert", "PostgreSQL", 1000, 10, Utc::now(), Duration::from_millis(500)),
                Measurement::recorded("Random Read", "PostgreSQL", 0, 0, Utc::now(), Duration::from_millis(1)),
            ],
        );
        suite.finish();
        suite
    }

    #[test]
    fn test_path_uses_prefix_and_start_time() {
        let suite = sample_suite();
        let reporter = CsvReporter::new("results", "dbcompare");
        let expected = format!("dbcompare_{}.csv", suite.started_at().format("%Y%m%d_%H%M%S"));
        assert_eq!(reporter.path_for(&suite), Path::new("results").join(expected));
    }

    #[test]
    fn test_generate_creates_directory_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("nested").join("results");
        let reporter = CsvReporter::new(&directory, "run");
        let suite = sample_suite();

        reporter.generate(&suite).unwrap();

        let mut reader = csv::Reader::from_path(reporter.path_for(&suite)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "PostgreSQL");
        assert_eq!(&rows[0][1], "Bulk Insert");
        assert_eq!(&rows[0][2], "500.000");
        assert_eq!(&rows[0][4], "2000.00");
        assert_eq!(&rows[0][6], "1.00");
        // Zero attempted units leave the rates undefined.
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[1][6], "");
    }
}
