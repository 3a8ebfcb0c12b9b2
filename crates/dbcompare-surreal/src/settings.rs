//! Connection and stress sizing for the SurrealDB backend.

use serde::{Deserialize, Serialize};

/// Default display label.
pub const DEFAULT_LABEL: &str = "SurrealDB";
/// Lookups per worker during the concurrent read phase.
pub const DEFAULT_READS_PER_WORKER: u64 = 100;
/// Creates per worker during the concurrent write phase.
pub const DEFAULT_WRITES_PER_WORKER: u64 = 50;

/// SurrealDB backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealSettings {
    pub enabled: bool,
    pub name: Option<String>,
    /// `ws://`, `http://` or `mem://` endpoint.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub reads_per_worker: u64,
    pub writes_per_worker: u64,
}

impl Default for SurrealSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            name: None,
            url: "ws://localhost:8000".to_string(),
            namespace: "benchmark".to_string(),
            database: "benchmark".to_string(),
            user: "root".to_string(),
            password: "root".to_string(),
            reads_per_worker: DEFAULT_READS_PER_WORKER,
            writes_per_worker: DEFAULT_WRITES_PER_WORKER,
        }
    }
}

impl SurrealSettings {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// Whether the endpoint is the in-process memory engine.
    pub fn is_embedded(&self) -> bool {
        self.url.starts_with("mem://")
    }
}
