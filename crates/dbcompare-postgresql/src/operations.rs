//! The operation catalog as run against PostgreSQL.

use crate::adapter::PostgreSQLAdapter;
use crate::error::PostgreSQLBenchError;
use crate::schema::{
    decode_age_group, decode_record, key_space, AGGREGATE_SQL, INSERT_SQL, SELECT_COLUMNS,
    TABLE_NAME,
};
use dbcompare_core::{
    concurrent_write_id, log_progress, run_stress, stress_units, Measurement, Operation, Record,
};
use std::sync::Arc;
use tokio_postgres::{Client, Statement};
use tracing::{debug, warn};

/// Indexed queries cycle through this many ages starting at 20.
const INDEXED_AGE_SPAN: u64 = 50;

impl PostgreSQLAdapter {
    /// Highest id available for lookups; an empty table fails the operation.
    async fn require_keys(&self, client: &Client, operation: Operation) -> Result<i64, PostgreSQLBenchError> {
        let max_id = key_space(client).await?;
        if max_id <= 0 {
            return Err(PostgreSQLBenchError::EmptyDataset(operation.label().to_string()));
        }
        Ok(max_id)
    }

    fn start(&self, operation: Operation, records: u64) -> dbcompare_core::PendingMeasurement {
        Measurement::start(operation.label(), &self.label, records)
    }

    pub(crate) async fn bulk_insert(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let total = self.workload.record_count;
        let batch_size = self.workload.batch_size.max(1);
        let statement = client.prepare(INSERT_SQL).await?;

        let pending = self
            .start(Operation::BulkWrite, total)
            .with_metadata("batch_size", batch_size);
        let mut errors = 0u64;
        let mut batch_rows = 0u64;
        let mut batch_errors = 0u64;

        if total > 0 {
            client.batch_execute("BEGIN").await?;
        }
        for i in 0..total {
            let record = self.generator.record(i as i64 + 1);
            if let Err(e) = insert_record(&client, &statement, &record).await {
                debug!("Insert of record {} failed: {}", record.id, e);
                batch_errors += 1;
            }
            batch_rows += 1;

            if batch_rows == batch_size || i + 1 == total {
                // A failed insert aborts the transaction and COMMIT then rolls
                // the whole batch back without reporting an error.
                if batch_errors > 0 {
                    warn!(
                        "Batch of {} rows rolled back after {} failed inserts",
                        batch_rows, batch_errors
                    );
                    batch_errors = batch_rows;
                }
                if let Err(e) = client.batch_execute("COMMIT").await {
                    warn!("Batch commit failed: {}", e);
                    batch_errors = batch_rows;
                }
                errors += batch_errors;
                batch_rows = 0;
                batch_errors = 0;
                if i + 1 < total {
                    if let Err(e) = client.batch_execute("BEGIN").await {
                        warn!("Failed to open batch transaction: {}", e);
                    }
                }
            }
            log_progress(Operation::BulkWrite, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    pub(crate) async fn sequential_read(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let total = self.workload.record_count;
        let limit = i64::try_from(total).unwrap_or(i64::MAX);

        let mut pending = self.start(Operation::SequentialScan, total);
        let rows = client
            .query(
                &format!("SELECT {SELECT_COLUMNS} FROM {TABLE_NAME} LIMIT $1"),
                &[&limit],
            )
            .await?;
        let errors = rows.iter().filter(|row| decode_record(row).is_err()).count() as u64;
        pending.insert_metadata("rows_returned", rows.len());

        Ok(pending.complete(errors))
    }

    pub(crate) async fn random_read(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let max_id = self.require_keys(&client, Operation::PointLookup).await?;
        let statement = client
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM {TABLE_NAME} WHERE id = $1"))
            .await?;
        let total = self.workload.random_reads;

        let pending = self.start(Operation::PointLookup, total);
        let mut errors = 0u64;
        for i in 0..total {
            let id = self.generator.random_id(max_id);
            match client.query_opt(&statement, &[&id]).await {
                Ok(Some(row)) => {
                    if decode_record(&row).is_err() {
                        errors += 1;
                    }
                }
                // A missing row is a valid answer, not a failure.
                Ok(None) => {}
                Err(_) => errors += 1,
            }
            log_progress(Operation::PointLookup, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    pub(crate) async fn indexed_query(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let statement = client
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM {TABLE_NAME} WHERE age = $1 LIMIT 10"
            ))
            .await?;
        let total = self.workload.indexed_queries;

        let pending = self.start(Operation::IndexedFilter, total);
        let mut errors = 0u64;
        for i in 0..total {
            let age = 20 + (i % INDEXED_AGE_SPAN) as i32;
            match client.query(&statement, &[&age]).await {
                Ok(rows) => {
                    if rows.iter().any(|row| decode_record(row).is_err()) {
                        errors += 1;
                    }
                }
                Err(_) => errors += 1,
            }
        }

        Ok(pending.complete(errors))
    }

    pub(crate) async fn update_records(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let max_id = self.require_keys(&client, Operation::Update).await?;
        let statement = client
            .prepare(&format!("UPDATE {TABLE_NAME} SET balance = $1 WHERE id = $2"))
            .await?;
        let total = self.workload.updates;

        let pending = self.start(Operation::Update, total);
        let mut errors = 0u64;
        for i in 0..total {
            let id = self.generator.random_id(max_id);
            let balance = self.generator.balance_update();
            if client.execute(&statement, &[&balance, &id]).await.is_err() {
                errors += 1;
            }
            log_progress(Operation::Update, i + 1, total);
        }

        Ok(pending.complete(errors))
    }

    pub(crate) async fn complex_query(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;

        let mut pending = self.start(Operation::AggregateQuery, 1);
        let errors = match client.query(AGGREGATE_SQL, &[]).await {
            Ok(rows) => {
                pending.insert_metadata("groups", rows.len());
                u64::from(rows.iter().any(|row| decode_age_group(row).is_err()))
            }
            Err(e) => {
                debug!("Aggregate query failed: {}", e);
                1
            }
        };

        Ok(pending.complete(errors))
    }

    pub(crate) async fn concurrent_reads(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let max_id = self.require_keys(&client, Operation::ConcurrentReads).await?;
        let statement = client
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM {TABLE_NAME} WHERE id = $1"))
            .await?;
        let workers = self.workload.concurrent_workers;
        let per_worker = self.settings.reads_per_worker;

        let pending = self
            .start(Operation::ConcurrentReads, stress_units(workers, per_worker))
            .with_metadata("workers", workers)
            .with_metadata("units_per_worker", per_worker);
        let generator = &self.generator;
        let outcome = run_stress(workers, per_worker, |worker| {
            let client = Arc::clone(&client);
            let statement = statement.clone();
            let mut generator = generator.fork(worker as u64);
            move |_unit| {
                let client = Arc::clone(&client);
                let statement = statement.clone();
                let id = generator.random_id(max_id);
                async move { client.query_opt(&statement, &[&id]).await.map(|_| ()) }
            }
        })
        .await;

        if let Some(e) = &outcome.first_error {
            debug!("First concurrent read failure: {}", e);
        }
        Ok(pending.complete(outcome.errors))
    }

    pub(crate) async fn concurrent_writes(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let statement = client.prepare(INSERT_SQL).await?;
        let workers = self.workload.concurrent_workers;
        let per_worker = self.settings.writes_per_worker;

        let pending = self
            .start(Operation::ConcurrentWrites, stress_units(workers, per_worker))
            .with_metadata("workers", workers)
            .with_metadata("units_per_worker", per_worker);
        let generator = &self.generator;
        let outcome = run_stress(workers, per_worker, |worker| {
            let client = Arc::clone(&client);
            let statement = statement.clone();
            let mut generator = generator.fork(worker as u64);
            move |unit| {
                let client = Arc::clone(&client);
                let statement = statement.clone();
                let record = generator.record(concurrent_write_id(worker, per_worker, unit));
                async move {
                    insert_record(&client, &statement, &record)
                        .await
                        .map(|_| ())
                }
            }
        })
        .await;

        if let Some(e) = &outcome.first_error {
            debug!("First concurrent write failure: {}", e);
        }
        Ok(pending.complete(outcome.errors))
    }

    pub(crate) async fn transactions(&mut self) -> Result<Measurement, PostgreSQLBenchError> {
        let client = self.client()?;
        let max_id = self.require_keys(&client, Operation::Transaction).await?;
        let debit = client
            .prepare(&format!("UPDATE {TABLE_NAME} SET balance = balance - 10 WHERE id = $1"))
            .await?;
        let credit = client
            .prepare(&format!("UPDATE {TABLE_NAME} SET balance = balance + 10 WHERE id = $1"))
            .await?;
        let total = self.workload.transactions;

        let pending = self.start(Operation::Transaction, total);
        let mut errors = 0u64;
        for i in 0..total {
            let from = self.generator.random_id(max_id);
            let to = self.generator.random_id(max_id);
            if let Err(e) = transfer(&client, &debit, &credit, from, to).await {
                debug!("Transfer {} -> {} failed: {}", from, to, e);
                errors += 1;
                if let Err(e) = client.batch_execute("ROLLBACK").await {
                    debug!("Rollback failed: {}", e);
                }
            }
            log_progress(Operation::Transaction, i + 1, total);
        }

        Ok(pending.complete(errors))
    }
}

async fn insert_record(
    client: &Client,
    statement: &Statement,
    record: &Record,
) -> Result<u64, tokio_postgres::Error> {
    client
        .execute(
            statement,
            &[
                &record.name,
                &record.email,
                &record.age,
                &record.balance,
                &record.created_at,
                &record.description,
                &record.is_active,
            ],
        )
        .await
}

async fn transfer(
    client: &Client,
    debit: &Statement,
    credit: &Statement,
    from: i64,
    to: i64,
) -> Result<(), tokio_postgres::Error> {
    client.batch_execute("BEGIN").await?;
    client.execute(debit, &[&from]).await?;
    client.execute(credit, &[&to]).await?;
    client.batch_execute("COMMIT").await?;
    Ok(())
}
