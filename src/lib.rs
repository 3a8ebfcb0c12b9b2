//! dbcompare library
//!
//! Runs the same workload against several databases and compares the
//! results. Backends are described in a YAML file (see [`config`]) and
//! connected by [`backends::connect_backends`]; orchestration, measurement
//! and reporting live in the `dbcompare-*` crates under `crates/`.
//!
//! # CLI Usage
//!
//! ```bash
//! # Run every enabled database from the config file
//! dbcompare run --config configs/config.yml
//!
//! # Run only PostgreSQL
//! dbcompare run --db postgres
//!
//! # Re-render a saved suite as CSV
//! dbcompare report --input results/dbcompare_20250101_120000.json --format csv
//! ```

pub mod backends;
pub mod config;

pub use backends::connect_backends;
pub use config::{Config, ConfigError, DatabaseConfig, OutputConfig};
