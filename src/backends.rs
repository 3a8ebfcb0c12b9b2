//! Connects configured databases and wraps them as runner entries.

use crate::config::{Config, DatabaseConfig};
use dbcompare_core::{BackendAdapter, BackendEntry, WorkloadConfig};
use dbcompare_postgresql::PostgreSQLAdapter;
use dbcompare_surreal::SurrealAdapter;

/// Connect every enabled database selected by `filter`, in configuration order.
///
/// A database that cannot be reached is logged and left out of the run.
pub async fn connect_backends(config: &Config, filter: Option<&str>) -> Vec<BackendEntry> {
    let mut entries = Vec::new();
    for database in config.selected_databases(filter) {
        match connect(database, &config.benchmark).await {
            Ok(adapter) => entries.push(BackendEntry::new(database.key(), adapter)),
            Err(e) => tracing::warn!("Skipping {}: failed to connect: {}", database.label(), e),
        }
    }
    entries
}

async fn connect(
    database: &DatabaseConfig,
    workload: &WorkloadConfig,
) -> anyhow::Result<Box<dyn BackendAdapter>> {
    let adapter: Box<dyn BackendAdapter> = match database {
        DatabaseConfig::Postgres(settings) => {
            Box::new(PostgreSQLAdapter::connect(settings.clone(), workload.clone()).await?)
        }
        DatabaseConfig::SurrealDB(settings) => {
            Box::new(SurrealAdapter::connect(settings.clone(), workload.clone()).await?)
        }
    };
    Ok(adapter)
}
