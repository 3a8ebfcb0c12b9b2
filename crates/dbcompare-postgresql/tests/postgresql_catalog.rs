//! Runs the operation catalog against a live PostgreSQL server.
//!
//! Set `DBCOMPARE_POSTGRES_URL` to point at a scratch database.

use dbcompare_core::{BackendAdapter, Operation, WorkloadConfig};
use dbcompare_postgresql::{PostgreSQLAdapter, PostgreSQLSettings};

fn settings() -> PostgreSQLSettings {
    PostgreSQLSettings {
        connection_string: Some(std::env::var("DBCOMPARE_POSTGRES_URL").unwrap_or_else(|_| {
            "host=localhost user=postgres password=postgres dbname=benchmark".to_string()
        })),
        reads_per_worker: 20,
        writes_per_worker: 10,
        ..Default::default()
    }
}

fn small_workload(record_count: u64) -> WorkloadConfig {
    WorkloadConfig {
        record_count,
        batch_size: 50,
        random_reads: 100,
        updates: 100,
        transactions: 20,
        indexed_queries: 20,
        concurrent_workers: 4,
        seed: Some(42),
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL instance"]
async fn test_full_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = PostgreSQLAdapter::connect(settings(), small_workload(500)).await?;
    adapter.prepare().await?;
    let measurements = adapter.execute().await?;
    adapter.release().await?;

    let labels: Vec<&str> = measurements.iter().map(|m| m.operation()).collect();
    let expected: Vec<&str> = Operation::CATALOG.iter().map(|op| op.label()).collect();
    assert_eq!(labels, expected);

    for m in &measurements {
        let rate = m.error_rate().unwrap();
        assert!((0.0..=1.0).contains(&rate), "{} error rate {rate}", m.operation());
        assert_eq!(m.backend(), "PostgreSQL");
    }

    let stress = measurements
        .iter()
        .find(|m| m.operation() == "Concurrent Reads")
        .unwrap();
    assert_eq!(stress.records_count(), 80);
    Ok(())
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL instance"]
async fn test_empty_table_skips_key_lookups() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = PostgreSQLAdapter::connect(settings(), small_workload(0)).await?;
    adapter.prepare().await?;
    let measurements = adapter.execute().await?;
    adapter.release().await?;

    let labels: Vec<&str> = measurements.iter().map(|m| m.operation()).collect();
    assert!(!labels.contains(&"Random Read"));
    assert!(!labels.contains(&"Update Operations"));
    assert!(!labels.contains(&"Concurrent Reads"));
    assert!(labels.contains(&"Bulk Insert"));
    assert!(labels.contains(&"Concurrent Writes"));
    Ok(())
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL instance"]
async fn test_rejected_insert_fails_whole_batch() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings();
    let mut workload = small_workload(100);
    workload.batch_size = 50;
    let mut adapter = PostgreSQLAdapter::connect(settings.clone(), workload).await?;
    adapter.prepare().await?;

    let (client, connection) =
        tokio_postgres::connect(&settings.connection_string(), tokio_postgres::NoTls).await?;
    tokio::spawn(connection);
    client
        .batch_execute(
            "CREATE OR REPLACE FUNCTION reject_record_ten() RETURNS trigger AS $$
             BEGIN
                 IF NEW.id = 10 THEN
                     RAISE EXCEPTION 'record 10 rejected';
                 END IF;
                 RETURN NEW;
             END;
             $$ LANGUAGE plpgsql;
             CREATE TRIGGER reject_record_ten BEFORE INSERT ON benchmark_records
                 FOR EACH ROW EXECUTE FUNCTION reject_record_ten();",
        )
        .await?;

    let measurements = adapter.execute().await?;
    adapter.release().await?;

    let bulk = measurements
        .iter()
        .find(|m| m.operation() == "Bulk Insert")
        .unwrap();
    // The first batch is rolled back in full, the second commits.
    assert_eq!(bulk.records_count(), 100);
    assert_eq!(bulk.error_count(), 50);

    client.batch_execute("DROP FUNCTION IF EXISTS reject_record_ten() CASCADE").await?;
    Ok(())
}
