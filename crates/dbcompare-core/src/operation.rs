//! The fixed catalog of workload operations.

use std::fmt;

/// A named workload every backend may run.
///
/// Labels are what ends up in measurements and reports, so they must stay
/// stable across backends for the comparison to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BulkWrite,
    SequentialScan,
    PointLookup,
    IndexedFilter,
    Update,
    AggregateQuery,
    ConcurrentReads,
    ConcurrentWrites,
    Transaction,
}

impl Operation {
    /// Catalog in execution order.
    pub const CATALOG: [Operation; 9] = [
        Operation::BulkWrite,
        Operation::SequentialScan,
        Operation::PointLookup,
        Operation::IndexedFilter,
        Operation::Update,
        Operation::AggregateQuery,
        Operation::ConcurrentReads,
        Operation::ConcurrentWrites,
        Operation::Transaction,
    ];

    /// Display label used in measurements.
    pub fn label(self) -> &'static str {
        match self {
            Operation::BulkWrite => "Bulk Insert",
            Operation::SequentialScan => "Sequential Read",
            Operation::PointLookup => "Random Read",
            Operation::IndexedFilter => "Indexed Query",
            Operation::Update => "Update Operations",
            Operation::AggregateQuery => "Complex Query",
            Operation::ConcurrentReads => "Concurrent Reads",
            Operation::ConcurrentWrites => "Concurrent Writes",
            Operation::Transaction => "Transaction Performance",
        }
    }

    /// Whether the operation picks keys from records that must already exist.
    pub fn requires_existing_keys(self) -> bool {
        matches!(
            self,
            Operation::PointLookup
                | Operation::Update
                | Operation::ConcurrentReads
                | Operation::Transaction
        )
    }

    /// Whether the operation fans out over concurrent workers.
    pub fn is_stress(self) -> bool {
        matches!(self, Operation::ConcurrentReads | Operation::ConcurrentWrites)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
