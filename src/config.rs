//! YAML configuration for a benchmark run.

use dbcompare_core::WorkloadConfig;
use dbcompare_postgresql::PostgreSQLSettings;
use dbcompare_report::OutputFormat;
use dbcompare_surreal::SurrealSettings;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yml";
pub const DEFAULT_OUTPUT_DIR: &str = "./results";
pub const DEFAULT_FILENAME_PREFIX: &str = "dbcompare";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Database label '{0}' is used more than once; set a distinct `name` for each entry")]
    DuplicateLabel(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backends in run order.
    pub databases: Vec<DatabaseConfig>,
    pub benchmark: WorkloadConfig,
    pub output: OutputConfig,
}

/// One configured backend, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatabaseConfig {
    #[serde(rename = "postgres", alias = "postgresql")]
    Postgres(PostgreSQLSettings),
    #[serde(rename = "surrealdb", alias = "surreal")]
    SurrealDB(SurrealSettings),
}

impl DatabaseConfig {
    /// Configuration key, as written in the `type` field.
    pub fn key(&self) -> &'static str {
        match self {
            DatabaseConfig::Postgres(_) => "postgres",
            DatabaseConfig::SurrealDB(_) => "surrealdb",
        }
    }

    /// Display label of the backend.
    pub fn label(&self) -> &str {
        match self {
            DatabaseConfig::Postgres(settings) => settings.label(),
            DatabaseConfig::SurrealDB(settings) => settings.label(),
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            DatabaseConfig::Postgres(settings) => settings.enabled,
            DatabaseConfig::SurrealDB(settings) => settings.enabled,
        }
    }

    /// Same matching rule the runner applies to `--db`.
    pub fn matches(&self, filter: &str) -> bool {
        self.key().eq_ignore_ascii_case(filter) || self.label().eq_ignore_ascii_case(filter)
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// A single format or a list of formats.
    #[serde(deserialize_with = "one_or_many")]
    pub format: Vec<OutputFormat>,
    pub directory: PathBuf,
    pub filename_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: vec![OutputFormat::Console],
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<OutputFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(OutputFormat),
        Many(Vec<OutputFormat>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(format) => vec![format],
        OneOrMany::Many(formats) => formats,
    })
}

impl Config {
    /// Load and normalize a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.benchmark = config.benchmark.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Enabled databases must have distinct labels (case-insensitive), since
    /// results are grouped by label.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut labels: Vec<String> = Vec::new();
        for database in self.databases.iter().filter(|db| db.enabled()) {
            let label = database.label().to_lowercase();
            if labels.contains(&label) {
                return Err(ConfigError::DuplicateLabel(database.label().to_string()));
            }
            labels.push(label);
        }
        Ok(())
    }

    /// Enabled databases selected by `filter`, in configuration order.
    pub fn selected_databases<'a>(&'a self, filter: Option<&'a str>) -> impl Iterator<Item = &'a DatabaseConfig> + 'a {
        self.databases
            .iter()
            .filter(|db| db.enabled())
            .filter(move |db| filter.is_none_or(|f| db.matches(f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
databases:
  - type: postgres
    host: db.internal
    port: 6543
    reads_per_worker: 10
  - type: surrealdb
    url: mem://
    name: Surreal (memory)
  - type: postgres
    enabled: false
benchmark:
  record_count: 500
  batch_size: 0
  concurrent_workers: 0
  seed: 7
output:
  format: [console, csv, json]
  directory: /tmp/out
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.databases.len(), 3);

        match &config.databases[0] {
            DatabaseConfig::Postgres(pg) => {
                assert_eq!(pg.host, "db.internal");
                assert_eq!(pg.port, 6543);
                assert_eq!(pg.reads_per_worker, 10);
                assert_eq!(pg.user, "postgres");
            }
            other => panic!("expected postgres, got {other:?}"),
        }
        assert_eq!(config.databases[1].label(), "Surreal (memory)");
        assert!(!config.databases[2].enabled());

        assert_eq!(config.benchmark.record_count, 500);
        assert_eq!(config.benchmark.batch_size, 1000);
        assert_eq!(config.benchmark.concurrent_workers, 10);
        assert_eq!(config.benchmark.random_reads, 10_000);
        assert_eq!(config.benchmark.seed, Some(7));

        assert_eq!(
            config.output.format,
            vec![OutputFormat::Console, OutputFormat::Csv, OutputFormat::Json]
        );
        assert_eq!(config.output.directory, PathBuf::from("/tmp/out"));
        assert_eq!(config.output.filename_prefix, "dbcompare");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert!(config.databases.is_empty());
        assert_eq!(config.benchmark, WorkloadConfig::default());
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_single_format_value() {
        let config = Config::from_yaml("output:\n  format: json\n").unwrap();
        assert_eq!(config.output.format, vec![OutputFormat::Json]);
    }

    #[test]
    fn test_unknown_database_type_is_rejected() {
        let result = Config::from_yaml("databases:\n  - type: oracle\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_duplicate_labels_are_rejected() {
        let result = Config::from_yaml("databases:\n  - type: postgres\n  - type: postgres\n    host: replica\n");
        assert!(matches!(result, Err(ConfigError::DuplicateLabel(label)) if label == "PostgreSQL"));

        let renamed = Config::from_yaml(
            "databases:\n  - type: postgres\n  - type: postgres\n    name: PostgreSQL Replica\n",
        )
        .unwrap();
        assert_eq!(renamed.databases.len(), 2);

        let case_only = Config::from_yaml(
            "databases:\n  - type: surrealdb\n    name: Bench\n  - type: postgres\n    name: BENCH\n",
        );
        assert!(matches!(case_only, Err(ConfigError::DuplicateLabel(_))));
    }

    #[test]
    fn test_selected_databases() {
        let config = Config::from_yaml(SAMPLE).unwrap();

        let all: Vec<&str> = config.selected_databases(None).map(|db| db.label()).collect();
        assert_eq!(all, vec!["PostgreSQL", "Surreal (memory)"]);

        let surreal: Vec<&str> = config
            .selected_databases(Some("SURREALDB"))
            .map(|db| db.label())
            .collect();
        assert_eq!(surreal, vec!["Surreal (memory)"]);

        assert_eq!(config.selected_databases(Some("mysql")).count(), 0);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.databases.len(), 3);

        let missing = Config::from_file(Path::new("/nonexistent/dbcompare.yml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
