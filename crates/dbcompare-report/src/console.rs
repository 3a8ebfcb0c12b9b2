//! Human-readable console report.

use crate::error::ReportError;
use crate::ranking::{compare, Comparison};
use crate::Reporter;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use dbcompare_core::{BackendStatus, Suite};
use std::time::Duration;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Prints per-backend results, per-operation comparisons and the overall ranking.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the full report as a string.
    pub fn render(&self, suite: &Suite) -> String {
        let mut output = String::new();

        output.push_str("\n=== Database Benchmark Results ===\n");
        output.push_str(&format!(
            "Started: {}  Total duration: {}\n",
            suite.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
            format_duration(suite.duration())
        ));
        if !suite.config().is_empty() {
            let config: Vec<String> = suite
                .config()
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            output.push_str(&format!("Workload: {}\n", config.join(", ")));
        }

        for backend in suite.backend_labels() {
            output.push_str(&format!("\n{backend}\n"));
            output.push_str(&backend_table(suite, backend).to_string());
            output.push('\n');
        }

        let incomplete: Vec<String> = suite
            .backends()
            .iter()
            .filter_map(|run| match &run.status {
                BackendStatus::Completed => None,
                BackendStatus::SetupFailed { error } => {
                    Some(format!("- {}: setup failed ({error})", run.backend))
                }
                BackendStatus::ExecuteFailed { error } => {
                    Some(format!("- {}: run failed ({error})", run.backend))
                }
                BackendStatus::Cancelled => Some(format!("- {}: cancelled", run.backend)),
            })
            .collect();
        if !incomplete.is_empty() {
            output.push_str("\nBackends without results:\n");
            output.push_str(&incomplete.join("\n"));
            output.push('\n');
        }

        let comparison = compare(suite);
        if !comparison.is_empty() {
            output.push_str(&comparison_section(&comparison));
        }

        output
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &str {
        "console"
    }

    fn generate(&self, suite: &Suite) -> Result<(), ReportError> {
        println!("{}", self.render(suite));
        Ok(())
    }
}

fn backend_table(suite: &Suite, backend: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Operation",
        "Records",
        "Duration",
        "Ops/sec",
        "Errors",
        "Error Rate",
    ]);

    for m in suite.measurements_for(backend) {
        let errors_cell = if m.error_count() > 0 {
            Cell::new(format_number(m.error_count())).fg(Color::Red)
        } else {
            Cell::new("0")
        };
        table.add_row(vec![
            Cell::new(m.operation()),
            Cell::new(format_number(m.records_count())),
            Cell::new(format_duration(m.duration())),
            Cell::new(format_throughput(m.throughput())),
            errors_cell,
            Cell::new(format_rate(m.error_rate())),
        ]);
    }
    table
}

fn comparison_section(comparison: &Comparison) -> String {
    let mut output = String::from("\n=== Operation Comparison ===\n");

    for ranking in &comparison.rankings {
        output.push_str(&format!("\n{}\n", ranking.operation));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Rank", "Database", "Ops/sec", "vs Fastest", "Duration", "Error Rate"]);
        for entry in &ranking.entries {
            let rank = MEDALS
                .get(entry.rank - 1)
                .map(|medal| medal.to_string())
                .unwrap_or_else(|| format!("#{}", entry.rank));
            let diff = if entry.rank == 1 {
                Cell::new("fastest").fg(Color::Green)
            } else {
                Cell::new(format!("{:.1}%", entry.percent_diff))
            };
            table.add_row(vec![
                Cell::new(rank),
                Cell::new(&entry.backend),
                Cell::new(format!("{:.2}", entry.throughput)),
                diff,
                Cell::new(format_duration(entry.duration)),
                Cell::new(format_rate(entry.error_rate)),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str("\n=== Overall Ranking ===\n");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rank", "Database", "Points"]);
    for (i, score) in comparison.scores.iter().enumerate() {
        let name = if i == 0 {
            Cell::new(&score.backend).fg(Color::Cyan)
        } else {
            Cell::new(&score.backend)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            name,
            Cell::new(score.points),
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Format duration in human-readable format.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

fn format_throughput(throughput: Option<f64>) -> String {
    throughput
        .map(|t| format!("{t:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dbcompare_core::{BackendRun, Measurement};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250.0ms");
        assert_eq!(format_duration(Duration::from_millis(5500)), "5.50s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 01m");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(100), "100");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
    }

    #[test]
    fn test_render_lists_rankings_and_failures() {
        let mut suite = Suite::begin();
        suite.record(
            BackendRun::new("Alpha", BackendStatus::Completed, 1),
            vec![Measurement::recorded("Bulk Insert", "Alpha", 1000, 0, Utc::now(), Duration::from_secs(1))],
        );
        suite.record(
            BackendRun::new("Beta", BackendStatus::Completed, 1),
            vec![Measurement::recorded("Bulk Insert", "Beta", 500, 5, Utc::now(), Duration::from_secs(1))],
        );
        suite.record(
            BackendRun::new(
                "Gamma",
                BackendStatus::SetupFailed {
                    error: "permission denied".to_string(),
                },
                0,
            ),
            Vec::new(),
        );
        suite.finish();

        let output = ConsoleReporter::new().render(&suite);
        assert!(output.contains("Operation Comparison"));
        assert!(output.contains("Overall Ranking"));
        assert!(output.contains("-50.0%"));
        assert!(output.contains("Gamma: setup failed (permission denied)"));
        assert!(output.contains("1.00%"));
    }

    #[test]
    fn test_single_backend_has_no_comparison() {
        let mut suite = Suite::begin();
        suite.record(
            BackendRun::new("Alpha", BackendStatus::Completed, 1),
            vec![Measurement::recorded("Bulk Insert", "Alpha", 10, 0, Utc::now(), Duration::from_secs(1))],
        );
        suite.finish();

        let output = ConsoleReporter::new().render(&suite);
        assert!(output.contains("Alpha"));
        assert!(!output.contains("Overall Ranking"));
    }
}
