//! Transaction aggregation.
//!
//! This module provides pure business logic over transaction lists:
//! - Daily buckets (`DayTotal`) keyed by local calendar date
//! - Month summaries (`MonthSummary`)
//! - Date- and month-scoped retrieval

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod benchmark;

pub use engine::AggregationEngine;
pub use error::AggregationError;
pub use types::{DayTotal, DayTotals, MonthSummary, Transaction, TransactionType};
