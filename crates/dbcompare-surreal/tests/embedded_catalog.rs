//! Runs the SurrealDB catalog against the in-memory engine.

use dbcompare_core::{BackendAdapter, WorkloadConfig};
use dbcompare_surreal::{SurrealAdapter, SurrealSettings};

fn embedded_settings(database: &str) -> SurrealSettings {
    SurrealSettings {
        url: "mem://".to_string(),
        database: database.to_string(),
        reads_per_worker: 10,
        writes_per_worker: 5,
        ..Default::default()
    }
}

fn small_workload(record_count: u64) -> WorkloadConfig {
    WorkloadConfig {
        record_count,
        batch_size: 10,
        random_reads: 25,
        updates: 25,
        transactions: 5,
        indexed_queries: 5,
        concurrent_workers: 3,
        seed: Some(7),
    }
}

#[tokio::test]
async fn test_embedded_catalog_produces_measurements() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter =
        SurrealAdapter::connect(embedded_settings("catalog"), small_workload(50)).await?;
    adapter.prepare().await?;
    let measurements = adapter.execute().await?;
    adapter.release().await?;

    let labels: Vec<&str> = measurements.iter().map(|m| m.operation()).collect();
    assert_eq!(
        labels,
        vec![
            "Bulk Insert",
            "Sequential Read",
            "Random Read",
            "Update Operations",
            "Concurrent Reads",
            "Concurrent Writes"
        ]
    );

    for m in &measurements {
        assert_eq!(m.backend(), "SurrealDB");
        let rate = m.error_rate().unwrap();
        assert!((0.0..=1.0).contains(&rate), "{} error rate {rate}", m.operation());
    }

    let bulk = &measurements[0];
    assert_eq!(bulk.records_count(), 50);
    assert_eq!(bulk.error_count(), 0);

    let reads = &measurements[4];
    assert_eq!(reads.records_count(), 30);
    Ok(())
}

#[tokio::test]
async fn test_empty_dataset_omits_point_lookup() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = SurrealAdapter::connect(embedded_settings("empty"), small_workload(0)).await?;
    adapter.prepare().await?;
    let measurements = adapter.execute().await?;
    adapter.release().await?;

    let labels: Vec<&str> = measurements.iter().map(|m| m.operation()).collect();
    assert!(!labels.contains(&"Random Read"));
    assert!(!labels.contains(&"Update Operations"));
    assert!(!labels.contains(&"Concurrent Reads"));
    assert!(labels.contains(&"Concurrent Writes"));

    let bulk = measurements
        .iter()
        .find(|m| m.operation() == "Bulk Insert")
        .unwrap();
    assert_eq!(bulk.records_count(), 0);
    assert_eq!(bulk.error_rate(), None);
    Ok(())
}

#[tokio::test]
async fn test_prepare_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = SurrealAdapter::connect(embedded_settings("idempotent"), small_workload(5)).await?;
    adapter.prepare().await?;
    adapter.prepare().await?;
    adapter.release().await?;
    Ok(())
}
