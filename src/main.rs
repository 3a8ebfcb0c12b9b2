//! Command-line interface for dbcompare
//!
//! # Usage Examples
//!
//! ## Benchmark Run
//! ```bash
//! # Every enabled database in the config, in configuration order
//! dbcompare run --config configs/config.yml
//!
//! # Only the SurrealDB entry, writing CSV and JSON in addition to the console
//! dbcompare run --db surrealdb --format console --format csv --format json
//! ```
//!
//! ## Reports From a Saved Suite
//! ```bash
//! dbcompare report --input results/dbcompare_20250101_120000.json --format console
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use dbcompare::config::{Config, DEFAULT_CONFIG_PATH, DEFAULT_FILENAME_PREFIX, DEFAULT_OUTPUT_DIR};
use dbcompare::connect_backends;
use dbcompare_core::{BenchmarkRunner, Suite};
use dbcompare_report::{build_reporters, generate_all, load_suite, OutputFormat};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "dbcompare")]
#[command(about = "Compare database performance with a shared workload")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark against the configured databases
    Run {
        /// Path to the YAML configuration file
        #[arg(long, env = "DBCOMPARE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Only run the database with this type or name
        #[arg(long)]
        db: Option<String>,

        /// Report formats, overriding the config file (repeatable)
        #[arg(long, value_enum)]
        format: Vec<OutputFormat>,

        /// Directory for file reports, overriding the config file
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Render reports from a suite previously saved as JSON
    Report {
        /// Suite JSON file written by the json reporter
        #[arg(long)]
        input: PathBuf,

        /// Report formats (repeatable)
        #[arg(long, value_enum, default_value = "console")]
        format: Vec<OutputFormat>,

        /// Directory for file reports
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// File name prefix for file reports
        #[arg(long, default_value = DEFAULT_FILENAME_PREFIX)]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            db,
            format,
            output_dir,
        } => run_benchmark(&config, db.as_deref(), format, output_dir).await,
        Commands::Report {
            input,
            format,
            output_dir,
            prefix,
        } => {
            let suite = load_suite(&input)
                .with_context(|| format!("Failed to load suite from {input:?}"))?;
            write_reports(&suite, &format, &output_dir, &prefix);
            Ok(())
        }
    }
}

async fn run_benchmark(
    config_path: &Path,
    filter: Option<&str>,
    formats: Vec<OutputFormat>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {config_path:?}"))?;
    if !formats.is_empty() {
        config.output.format = formats;
    }
    if let Some(dir) = output_dir {
        config.output.directory = dir;
    }

    tracing::info!(
        "Starting benchmark: {} records, {} workers",
        config.benchmark.record_count,
        config.benchmark.concurrent_workers
    );

    let entries = connect_backends(&config, filter).await;
    let mut runner = BenchmarkRunner::new(entries)
        .context("No database available for benchmarking")?
        .with_cancellation(shutdown_token())
        .with_config(config.benchmark.to_metadata());

    tracing::info!("Benchmarking: {}", runner.backends().join(", "));
    let suite = runner.run(filter).await;

    write_reports(
        &suite,
        &config.output.format,
        &config.output.directory,
        &config.output.filename_prefix,
    );
    Ok(())
}

/// Report failures are logged; the run itself already completed.
fn write_reports(suite: &Suite, formats: &[OutputFormat], directory: &Path, prefix: &str) {
    let reporters = build_reporters(formats, directory, prefix);
    let failures = generate_all(&reporters, suite);
    if !failures.is_empty() {
        tracing::warn!("{} of {} reports failed", failures.len(), reporters.len());
    }
}

/// Cancel the run on Ctrl+C; the backend in progress is allowed to finish.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received interrupt signal (Ctrl+C), stopping after the current database");
            child.cancel();
        }
    });
    token
}
