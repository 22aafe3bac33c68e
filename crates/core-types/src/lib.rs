//! # Stratstore Core Types
//!
//! Shared record definitions for the strategy persistence layer. The three
//! record families (strategies, executions, metrics) are defined here along
//! with the validation contracts that guard both inserts and rows read back
//! from storage.
//!
//! This crate is a leaf: it knows nothing about the database or the
//! execution engines that produce these records.

pub mod enums;
pub mod error;
pub mod records;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::ExecutionStatus;
pub use error::ValidationError;
pub use records::{
    Execution, ExecutionOutcome, Metric, NewExecution, NewMetric, NewStrategy, Strategy,
};
