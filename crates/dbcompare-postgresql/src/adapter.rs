//! PostgreSQL backend adapter.

use crate::error::PostgreSQLBenchError;
use crate::schema::{recreate_table, table_stats};
use crate::settings::PostgreSQLSettings;
use async_trait::async_trait;
use dbcompare_core::{BackendAdapter, BenchError, CatalogRun, Measurement, Operation, WorkloadConfig};
use dbcompare_generator::RecordGenerator;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info, warn};

/// Runs the full operation catalog against one PostgreSQL database.
///
/// The client is shared through an `Arc` so stress workers can issue
/// queries concurrently over the same connection.
pub struct PostgreSQLAdapter {
    pub(crate) label: String,
    pub(crate) settings: PostgreSQLSettings,
    pub(crate) workload: WorkloadConfig,
    pub(crate) generator: RecordGenerator,
    client: Option<Arc<Client>>,
}

impl PostgreSQLAdapter {
    /// Connect to PostgreSQL and verify the connection.
    pub async fn connect(
        settings: PostgreSQLSettings,
        workload: WorkloadConfig,
    ) -> Result<Self, PostgreSQLBenchError> {
        let (client, connection) =
            tokio_postgres::connect(&settings.connection_string(), NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection
        client.simple_query("SELECT 1").await?;

        info!(
            "Connected to PostgreSQL at {}:{}/{}",
            settings.host, settings.port, settings.database
        );
        Ok(Self::with_client(Arc::new(client), settings, workload))
    }

    /// Create an adapter around an existing client.
    pub fn with_client(
        client: Arc<Client>,
        settings: PostgreSQLSettings,
        workload: WorkloadConfig,
    ) -> Self {
        let generator = RecordGenerator::from_optional_seed(workload.seed);
        Self {
            label: settings.label().to_string(),
            settings,
            workload,
            generator,
            client: Some(client),
        }
    }

    pub(crate) fn client(&self) -> Result<Arc<Client>, PostgreSQLBenchError> {
        self.client
            .as_ref()
            .map(Arc::clone)
            .ok_or(PostgreSQLBenchError::NotConnected)
    }

    async fn run_operation(&mut self, operation: Operation) -> Result<Measurement, PostgreSQLBenchError> {
        match operation {
            Operation::BulkWrite => self.bulk_insert().await,
            Operation::SequentialScan => self.sequential_read().await,
            Operation::PointLookup => self.random_read().await,
            Operation::IndexedFilter => self.indexed_query().await,
            Operation::Update => self.update_records().await,
            Operation::AggregateQuery => self.complex_query().await,
            Operation::ConcurrentReads => self.concurrent_reads().await,
            Operation::ConcurrentWrites => self.concurrent_writes().await,
            Operation::Transaction => self.transactions().await,
        }
    }
}

#[async_trait]
impl BackendAdapter for PostgreSQLAdapter {
    fn name(&self) -> &str {
        &self.label
    }

    async fn prepare(&mut self) -> Result<(), BenchError> {
        let client = self.client()?;
        recreate_table(&client)
            .await
            .map_err(|e| BenchError::Setup(e.to_string()))
    }

    async fn execute(&mut self) -> Result<Vec<Measurement>, BenchError> {
        let client = self.client()?;
        let mut run = CatalogRun::new(self.label.clone());
        for operation in Operation::CATALOG {
            let result = self.run_operation(operation).await;
            run.record(operation, result);
        }

        match table_stats(&client).await {
            Ok(stats) => {
                info!(
                    "{}: {} rows, table size {}",
                    self.label, stats.row_count, stats.table_size
                );
                for (index, size) in &stats.indexes {
                    debug!("{}: index {} {}", self.label, index, size);
                }
            }
            Err(e) => warn!("{}: failed to collect table statistics: {}", self.label, e),
        }

        Ok(run.finish())
    }

    async fn release(&mut self) -> Result<(), BenchError> {
        // Dropping the last client handle ends the connection task.
        if self.client.take().is_some() {
            debug!("Closed PostgreSQL connection for {}", self.label);
        }
        Ok(())
    }
}
