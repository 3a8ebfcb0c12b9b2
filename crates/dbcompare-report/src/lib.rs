//! Comparative reporting for dbcompare suites.
//!
//! [`ranking`] orders backends per operation and scores them across the
//! catalog. Reporters render a [`Suite`] to the console, a CSV file or a JSON
//! file; none of them modify the suite.

pub mod console;
pub mod csv_file;
pub mod error;
pub mod json_file;
pub mod ranking;

pub use console::ConsoleReporter;
pub use csv_file::CsvReporter;
pub use error::ReportError;
pub use json_file::{load_suite, JsonReporter};
pub use ranking::{compare, BackendScore, Comparison, OperationRanking, RankedEntry, RANK_POINTS};

use dbcompare_core::Suite;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A sink for a completed suite.
pub trait Reporter {
    fn name(&self) -> &str;

    fn generate(&self, suite: &Suite) -> Result<(), ReportError>;
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Csv,
    Json,
}

/// Build one reporter per requested format, skipping duplicates.
pub fn build_reporters(
    formats: &[OutputFormat],
    directory: &Path,
    prefix: &str,
) -> Vec<Box<dyn Reporter>> {
    let mut seen = Vec::new();
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
    for format in formats {
        if seen.contains(format) {
            continue;
        }
        seen.push(*format);
        reporters.push(match format {
            OutputFormat::Console => Box::new(ConsoleReporter::new()),
            OutputFormat::Csv => Box::new(CsvReporter::new(directory, prefix)),
            OutputFormat::Json => Box::new(JsonReporter::new(directory, prefix)),
        });
    }
    reporters
}

/// Run every reporter; a failing reporter does not stop the others.
///
/// Returns the failures by reporter name.
pub fn generate_all(reporters: &[Box<dyn Reporter>], suite: &Suite) -> Vec<(String, ReportError)> {
    let mut failures = Vec::new();
    for reporter in reporters {
        if let Err(e) = reporter.generate(suite) {
            tracing::error!("{} report failed: {}", reporter.name(), e);
            failures.push((reporter.name().to_string(), e));
        }
    }
    failures
}
