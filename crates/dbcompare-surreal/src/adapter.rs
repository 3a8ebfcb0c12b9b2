//! SurrealDB backend adapter.

use crate::connect::surreal_connect;
use crate::error::SurrealBenchError;
use crate::settings::SurrealSettings;
use async_trait::async_trait;
use dbcompare_core::{
    concurrent_write_id, log_progress, run_stress, stress_units, BackendAdapter, BenchError,
    CatalogRun, Measurement, Operation, PendingMeasurement, Record, WorkloadConfig,
};
use dbcompare_generator::RecordGenerator;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

pub const TABLE_NAME: &str = "test_records";

/// Operations this backend runs, in catalog order.
pub const SURREAL_CATALOG: [Operation; 6] = [
    Operation::BulkWrite,
    Operation::SequentialScan,
    Operation::PointLookup,
    Operation::Update,
    Operation::ConcurrentReads,
    Operation::ConcurrentWrites,
];

const FIELDS: &str = "name, email, age, balance, created_at, description, is_active";

/// Document shape stored in `test_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrealRecord {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub balance: f64,
    pub created_at: String,
    pub description: String,
    pub is_active: bool,
}

impl From<&Record> for SurrealRecord {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            age: record.age,
            balance: record.balance.to_f64().unwrap_or_default(),
            created_at: record.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            description: record.description.clone(),
            is_active: record.is_active,
        }
    }
}

/// Runs the SurrealDB subset of the operation catalog.
pub struct SurrealAdapter {
    label: String,
    settings: SurrealSettings,
    workload: WorkloadConfig,
    generator: RecordGenerator,
    db: Option<Surreal<Any>>,
}

impl SurrealAdapter {
    /// Connect using the configured endpoint, namespace and database.
    pub async fn connect(
        settings: SurrealSettings,
        workload: WorkloadConfig,
    ) -> Result<Self, SurrealBenchError> {
        let db = surreal_connect(&settings).await?;
        info!(
            "Connected to SurrealDB at {} ({}/{})",
            settings.url, settings.namespace, settings.database
        );
        Ok(Self::with_client(db, settings, workload))
    }

    /// Create an adapter around an existing connection.
    pub fn with_client(db: Surreal<Any>, settings: SurrealSettings, workload: WorkloadConfig) -> Self {
        let generator = RecordGenerator::from_optional_seed(workload.seed);
        Self {
            label: settings.label().to_string(),
            settings,
            workload,
            generator,
            db: Some(db),
        }
    }

    fn db(&self) -> Result<Surreal<Any>, SurrealBenchError> {
        self.db.clone().ok_or(SurrealBenchError::NotConnected)
    }

    fn start(&self, operation: Operation, records: u64) -> PendingMeasurement {
        Measurement::start(operation.label(), &self.label, records)
    }

    /// Number of records in the table; an empty table fails the operation.
    async fn require_keys(&self, db: &Surreal<Any>, operation: Operation) -> Result<i64, SurrealBenchError> {
        let count = count_records(db).await?;
        if count <= 0 {
            return Err(SurrealBenchError::EmptyDataset(operation.label().to_string()));
        }
        Ok(count)
    }

    async fn run_operation(&mut self, operation: Operation) -> Result<Measurement, SurrealBenchError> {
        match operation {
            Operation::BulkWrite => self.bulk_insert().await,
            Operation::SequentialScan => self.sequential_read().await,
            Operation::PointLookup => self.random_read().await,
            Operation::Update => self.update_records().await,
            Operation::ConcurrentReads => self.concurrent_reads().await,
            Operation::ConcurrentWrites => self.concurrent_writes().await,
            other => Err(SurrealBenchError::Unsupported(other)),
        }
    }

    async fn bulk_insert(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let total = self.workload.record_count;

        let pending = self.start(Operation::BulkWrite, total);
        let mut errors = 0u64;
        for i in 0..total {
            let record = self.generator.record(i as i64 + 1);
            if let Err(e) = create_record(&db, record.id, SurrealRecord::from(&record)).await {
                debug!("Create of record {} failed: {}", record.id, e);
                errors += 1;
            }
            log_progress(Operation::BulkWrite, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    async fn sequential_read(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let total = self.workload.record_count;
        let limit = i64::try_from(total).unwrap_or(i64::MAX);

        let mut pending = self.start(Operation::SequentialScan, total);
        let result = db
            .query(format!("SELECT {FIELDS} FROM type::table($table) LIMIT $limit"))
            .bind(("table", TABLE_NAME))
            .bind(("limit", limit))
            .await
            .and_then(|response| response.check());
        // The scan is a single request, so it either succeeds or counts as one failure.
        let errors = match result {
            Ok(mut response) => match response.take::<Vec<SurrealRecord>>(0) {
                Ok(rows) => {
                    pending.insert_metadata("rows_returned", rows.len());
                    0
                }
                Err(e) => {
                    debug!("Failed to decode scanned records: {}", e);
                    1
                }
            },
            Err(e) => {
                debug!("Sequential read failed: {}", e);
                1
            }
        };

        Ok(pending.complete(errors))
    }

    async fn random_read(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let max_id = self.require_keys(&db, Operation::PointLookup).await?;
        let total = self.workload.random_reads;

        let pending = self.start(Operation::PointLookup, total);
        let mut errors = 0u64;
        for i in 0..total {
            let id = self.generator.random_id(max_id);
            if read_record(&db, id).await.is_err() {
                errors += 1;
            }
            log_progress(Operation::PointLookup, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    async fn update_records(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let max_id = self.require_keys(&db, Operation::Update).await?;
        let total = self.workload.updates;

        let pending = self.start(Operation::Update, total);
        let mut errors = 0u64;
        for i in 0..total {
            let id = self.generator.random_id(max_id);
            let balance = self.generator.balance_update().to_f64().unwrap_or_default();
            let result = db
                .query("UPDATE type::thing($table, $id) SET balance = $balance")
                .bind(("table", TABLE_NAME))
                .bind(("id", id))
                .bind(("balance", balance))
                .await
                .and_then(|response| response.check());
            if result.is_err() {
                errors += 1;
            }
            log_progress(Operation::Update, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    async fn concurrent_reads(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let max_id = self.require_keys(&db, Operation::ConcurrentReads).await?;
        let workers = self.workload.concurrent_workers;
        let per_worker = self.settings.reads_per_worker;

        let pending = self
            .start(Operation::ConcurrentReads, stress_units(workers, per_worker))
            .with_metadata("workers", workers)
            .with_metadata("units_per_worker", per_worker);
        let generator = &self.generator;
        let outcome = run_stress(workers, per_worker, |worker| {
            let db = db.clone();
            let mut generator = generator.fork(worker as u64);
            move |_unit| {
                let db = db.clone();
                let id = generator.random_id(max_id);
                async move { read_record(&db, id).await.map(|_| ()) }
            }
        })
        .await;

        if let Some(e) = &outcome.first_error {
            debug!("First concurrent read failure: {}", e);
        }
        Ok(pending.complete(outcome.errors))
    }

    async fn concurrent_writes(&mut self) -> Result<Measurement, SurrealBenchError> {
        let db = self.db()?;
        let workers = self.workload.concurrent_workers;
        let per_worker = self.settings.writes_per_worker;

        let pending = self
            .start(Operation::ConcurrentWrites, stress_units(workers, per_worker))
            .with_metadata("workers", workers)
            .with_metadata("units_per_worker", per_worker);
        let generator = &self.generator;
        let outcome = run_stress(workers, per_worker, |worker| {
            let db = db.clone();
            let mut generator = generator.fork(worker as u64);
            move |unit| {
                let db = db.clone();
                let record = generator.record(concurrent_write_id(worker, per_worker, unit));
                async move { create_record(&db, record.id, SurrealRecord::from(&record)).await }
            }
        })
        .await;

        if let Some(e) = &outcome.first_error {
            debug!("First concurrent write failure: {}", e);
        }
        Ok(pending.complete(outcome.errors))
    }
}

#[async_trait]
impl BackendAdapter for SurrealAdapter {
    fn name(&self) -> &str {
        &self.label
    }

    async fn prepare(&mut self) -> Result<(), BenchError> {
        let db = self.db()?;
        info!("Removing table: {}", TABLE_NAME);
        db.query(format!("REMOVE TABLE IF EXISTS {TABLE_NAME}"))
            .await
            .and_then(|response| response.check())
            .map_err(|e| BenchError::Setup(e.to_string()))?;
        Ok(())
    }

    async fn execute(&mut self) -> Result<Vec<Measurement>, BenchError> {
        if self.db.is_none() {
            return Err(SurrealBenchError::NotConnected.into());
        }
        let mut run = CatalogRun::new(self.label.clone());
        for operation in SURREAL_CATALOG {
            let result = self.run_operation(operation).await;
            run.record(operation, result);
        }
        Ok(run.finish())
    }

    async fn release(&mut self) -> Result<(), BenchError> {
        // Dropping the last handle closes the session.
        if self.db.take().is_some() {
            debug!("Closed SurrealDB connection for {}", self.label);
        }
        Ok(())
    }
}

/// Create one record with an explicit numeric id.
async fn create_record(db: &Surreal<Any>, id: i64, record: SurrealRecord) -> Result<(), surrealdb::Error> {
    db.query("CREATE type::thing($table, $id) CONTENT $record")
        .bind(("table", TABLE_NAME))
        .bind(("id", id))
        .bind(("record", record))
        .await?
        .check()?;
    Ok(())
}

/// Read one record by id; a missing record is `Ok(None)`.
async fn read_record(db: &Surreal<Any>, id: i64) -> Result<Option<SurrealRecord>, surrealdb::Error> {
    let mut response = db
        .query(format!("SELECT {FIELDS} FROM type::thing($table, $id)"))
        .bind(("table", TABLE_NAME))
        .bind(("id", id))
        .await?
        .check()?;
    response.take::<Option<SurrealRecord>>(0)
}

/// Count the records in the benchmark table.
pub async fn count_records(db: &Surreal<Any>) -> Result<i64, SurrealBenchError> {
    let mut response = db
        .query("SELECT count() FROM type::table($table) GROUP ALL")
        .bind(("table", TABLE_NAME))
        .await?
        .check()?;
    let count: Option<i64> = response.take((0, "count"))?;
    Ok(count.unwrap_or(0))
}
