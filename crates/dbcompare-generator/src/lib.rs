//! Synthetic data generation for dbcompare.
//!
//! Records, lookup keys and balance updates all come from a seeded
//! [`RecordGenerator`], so a run can be reproduced by reusing its seed.

pub mod generator;
pub mod vocabulary;

pub use generator::RecordGenerator;
