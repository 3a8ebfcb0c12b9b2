//! Benchmark table DDL, row decoding and statistics queries.

use crate::error::PostgreSQLBenchError;
use dbcompare_core::Record;
use rust_decimal::Decimal;
use tokio_postgres::{Client, Row};
use tracing::{debug, info};

pub const TABLE_NAME: &str = "benchmark_records";

pub(crate) const SELECT_COLUMNS: &str =
    "id, name, email, age, balance, created_at, description, is_active";

pub(crate) const INSERT_SQL: &str = "INSERT INTO benchmark_records \
     (name, email, age, balance, created_at, description, is_active) \
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

pub(crate) const AGGREGATE_SQL: &str = "SELECT age, COUNT(*) AS user_count, \
     AVG(balance) AS avg_balance, MAX(balance) AS max_balance, MIN(balance) AS min_balance \
     FROM benchmark_records \
     WHERE is_active = true AND age > 25 \
     GROUP BY age \
     HAVING COUNT(*) > 5 \
     ORDER BY avg_balance DESC \
     LIMIT 50";

/// Statements that drop and recreate the benchmark table.
pub fn schema_statements() -> Vec<String> {
    let mut statements = vec![
        format!("DROP TABLE IF EXISTS {TABLE_NAME} CASCADE"),
        format!(
            "CREATE TABLE {TABLE_NAME} (\
             id BIGSERIAL PRIMARY KEY, \
             name VARCHAR(100) NOT NULL, \
             email VARCHAR(100) NOT NULL, \
             age INTEGER NOT NULL, \
             balance NUMERIC(10,2) NOT NULL, \
             created_at TIMESTAMPTZ NOT NULL, \
             description TEXT, \
             is_active BOOLEAN NOT NULL DEFAULT true)"
        ),
    ];
    for (index, column) in [
        ("idx_email", "email"),
        ("idx_age", "age"),
        ("idx_balance", "balance"),
        ("idx_created_at", "created_at"),
        ("idx_active", "is_active"),
    ] {
        statements.push(format!("CREATE INDEX {index} ON {TABLE_NAME}({column})"));
    }
    statements
}

/// Drop and recreate the benchmark table with its indexes.
pub async fn recreate_table(client: &Client) -> Result<(), PostgreSQLBenchError> {
    info!("Recreating table: {}", TABLE_NAME);
    for sql in schema_statements() {
        debug!("DDL: {}", sql);
        client.batch_execute(&sql).await?;
    }
    Ok(())
}

/// Highest record id in the table, 0 when empty.
pub async fn key_space(client: &Client) -> Result<i64, PostgreSQLBenchError> {
    let row = client
        .query_one(
            &format!("SELECT COALESCE(MAX(id), 0)::BIGINT FROM {TABLE_NAME}"),
            &[],
        )
        .await?;
    Ok(row.try_get(0)?)
}

pub(crate) fn decode_record(row: &Row) -> Result<Record, tokio_postgres::Error> {
    Ok(Record {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        age: row.try_get("age")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        description: row
            .try_get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        is_active: row.try_get("is_active")?,
    })
}

/// One row of the grouped aggregate query.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeGroup {
    pub age: i32,
    pub user_count: i64,
    pub avg_balance: Decimal,
    pub max_balance: Decimal,
    pub min_balance: Decimal,
}

pub(crate) fn decode_age_group(row: &Row) -> Result<AgeGroup, tokio_postgres::Error> {
    Ok(AgeGroup {
        age: row.try_get("age")?,
        user_count: row.try_get("user_count")?,
        avg_balance: row.try_get("avg_balance")?,
        max_balance: row.try_get("max_balance")?,
        min_balance: row.try_get("min_balance")?,
    })
}

/// Size information about the benchmark table.
#[derive(Debug, Clone, Default)]
pub struct TableStats {
    pub row_count: i64,
    pub table_size: String,
    /// Index name and pretty-printed size.
    pub indexes: Vec<(String, String)>,
}

/// Collect row count and on-disk sizes for the benchmark table.
pub async fn table_stats(client: &Client) -> Result<TableStats, PostgreSQLBenchError> {
    let row_count: i64 = client
        .query_one(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), &[])
        .await?
        .try_get(0)?;
    let table_size: String = client
        .query_one(
            "SELECT pg_size_pretty(pg_total_relation_size($1::text::regclass))",
            &[&TABLE_NAME],
        )
        .await?
        .try_get(0)?;
    let indexes = client
        .query(
            "SELECT indexrelname::text, pg_size_pretty(pg_relation_size(indexrelid)) \
             FROM pg_stat_user_indexes WHERE relname = $1 ORDER BY indexrelname",
            &[&TABLE_NAME],
        )
        .await?
        .iter()
        .map(|row| -> Result<(String, String), tokio_postgres::Error> {
            Ok((row.try_get(0)?, row.try_get(1)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableStats {
        row_count,
        table_size,
        indexes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_start_with_drop() {
        let statements = schema_statements();
        assert_eq!(
            statements[0],
            "DROP TABLE IF EXISTS benchmark_records CASCADE"
        );
        assert!(statements[1].contains("id BIGSERIAL PRIMARY KEY"));
        assert!(statements[1].contains("balance NUMERIC(10,2) NOT NULL"));
        assert_eq!(statements.len(), 7);
        assert!(statements
            .iter()
            .any(|s| s == "CREATE INDEX idx_active ON benchmark_records(is_active)"));
    }

    #[test]
    fn test_insert_binds_every_column_but_id() {
        assert!(INSERT_SQL.contains("$7"));
        assert!(!INSERT_SQL.contains("$8"));
        assert!(!INSERT_SQL.contains("(id,"));
    }
}
