//! Core aggregation logic for Tally.
//!
//! This crate contains pure business logic with ZERO storage or UI dependencies.
//! It consumes transactions already fetched by a storage collaborator and derives
//! calendar-bucketed aggregates from them.
//!
//! # Modules
//!
//! - `calendar` - Timestamp parsing, timezone-aware date keys, months, and clocks
//! - `currency` - Display formatting for monetary amounts
//! - `aggregation` - Daily buckets, month summaries, and date/month filters

pub mod aggregation;
pub mod calendar;
pub mod currency;

pub use aggregation::{
    AggregationEngine, AggregationError, DayTotal, DayTotals, MonthSummary, Transaction,
    TransactionType,
};
pub use calendar::{Clock, FixedClock, MonthBounds, MonthKey, SystemClock};
pub use currency::{format_currency, format_currency_code, format_money};
