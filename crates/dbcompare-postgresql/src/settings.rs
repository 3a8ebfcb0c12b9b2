//! Connection and stress sizing for the PostgreSQL backend.

use serde::{Deserialize, Serialize};

/// Default display label.
pub const DEFAULT_LABEL: &str = "PostgreSQL";
/// Point lookups per worker during the concurrent read phase.
pub const DEFAULT_READS_PER_WORKER: u64 = 1000;
/// Inserts per worker during the concurrent write phase.
pub const DEFAULT_WRITES_PER_WORKER: u64 = 100;

/// PostgreSQL backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgreSQLSettings {
    pub enabled: bool,
    /// Label override, useful when comparing two PostgreSQL servers.
    pub name: Option<String>,
    /// Full libpq-style connection string; takes precedence over the fields below.
    pub connection_string: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub sslmode: String,
    pub reads_per_worker: u64,
    pub writes_per_worker: u64,
}

impl Default for PostgreSQLSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            name: None,
            connection_string: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "benchmark".to_string(),
            sslmode: "disable".to_string(),
            reads_per_worker: DEFAULT_READS_PER_WORKER,
            writes_per_worker: DEFAULT_WRITES_PER_WORKER,
        }
    }
}

impl PostgreSQLSettings {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn connection_string(&self) -> String {
        match &self.connection_string {
            Some(conn) => conn.clone(),
            None => format!(
                "host={} port={} user={} password={} dbname={} sslmode={}",
                self.host, self.port, self.user, self.password, self.database, self.sslmode
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string_from_fields() {
        let settings = PostgreSQLSettings {
            host: "db.internal".to_string(),
            port: 6543,
            ..Default::default()
        };
        assert_eq!(
            settings.connection_string(),
            "host=db.internal port=6543 user=postgres password=postgres dbname=benchmark sslmode=disable"
        );
        assert_eq!(settings.label(), "PostgreSQL");
    }

    #[test]
    fn test_explicit_connection_string_wins() {
        let settings = PostgreSQLSettings {
            name: Some("PostgreSQL 16".to_string()),
            connection_string: Some("postgresql://bench@localhost/bench".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.connection_string(), "postgresql://bench@localhost/bench");
        assert_eq!(settings.label(), "PostgreSQL 16");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: PostgreSQLSettings = serde_yaml::from_str("host: pg\nreads_per_worker: 50\n").unwrap();
        assert_eq!(settings.host, "pg");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.reads_per_worker, 50);
        assert_eq!(settings.writes_per_worker, DEFAULT_WRITES_PER_WORKER);
        assert!(settings.enabled);
    }
}
