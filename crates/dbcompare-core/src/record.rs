//! The synthetic record written and read by every workload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A synthetic customer-like entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Identity assigned by the generator.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    /// Monetary balance with two decimal places.
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub is_active: bool,
}
