//! Aggregation error types.
//!
//! Every failure is synchronous and surfaced to the caller as-is. Nothing is
//! retried or logged here; the caller decides how to report it.

use chrono::NaiveDate;
use tally_shared::AppError;
use thiserror::Error;

/// Errors that can occur while aggregating or filtering transactions.
#[derive(Debug, Error)]
pub enum AggregationError {
    // ========== Input Record Errors ==========
    /// A transaction timestamp is not a valid RFC 3339 instant.
    #[error("Invalid timestamp '{timestamp}': {source}")]
    Parse {
        /// The offending timestamp string.
        timestamp: String,
        /// Underlying chrono parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// A running total left the representable `Decimal` range.
    #[error("Amount overflow while aggregating {date}")]
    Overflow {
        /// Bucket date being summed when the overflow occurred.
        date: NaiveDate,
    },

    // ========== Query Argument Errors ==========
    /// Month argument is not `YYYY-MM` with a month in 01-12.
    #[error("Invalid month '{0}': expected YYYY-MM with month 01-12")]
    InvalidMonth(String),

    /// Date argument is not a valid `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Currency code is not supported.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Timezone is not a known IANA zone name.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl AggregationError {
    /// Returns the error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "INVALID_TIMESTAMP",
            Self::Overflow { .. } => "AMOUNT_OVERFLOW",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::UnknownTimezone(_) => "UNKNOWN_TIMEZONE",
        }
    }

    /// Returns the process exit code of the [`AppError`] this converts into.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_argument_error() { 2 } else { 4 }
    }

    /// Returns true if the error was caused by a query argument rather than the data.
    #[must_use]
    pub const fn is_argument_error(&self) -> bool {
        !matches!(self, Self::Parse { .. } | Self::Overflow { .. })
    }
}

impl From<AggregationError> for AppError {
    fn from(err: AggregationError) -> Self {
        if err.is_argument_error() {
            Self::Validation(err.to_string())
        } else {
            Self::Parse(err.to_string())
        }
    }
}
