//! Timestamp parsing and local date keys.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::aggregation::AggregationError;

/// Parses an RFC 3339 timestamp (e.g. `2025-12-01T10:00:00.000Z`) into a UTC instant.
///
/// Offsets other than `Z` are accepted and normalized to UTC.
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, AggregationError> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| AggregationError::Parse {
            timestamp: timestamp.to_string(),
            source,
        })
}

/// Returns the calendar date of `instant` as observed in `tz`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Renders a date as a zero-padded `YYYY-MM-DD` key.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a strict `YYYY-MM-DD` key.
///
/// Unpadded components such as `2025-1-5` are rejected so that a key parses only
/// if it is exactly what [`date_key`] would have produced.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, AggregationError> {
    let invalid = || AggregationError::InvalidDate(key.to_string());

    let bytes = key.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|_| invalid())
}

/// Resolves an IANA timezone name. `UTC` is matched case-insensitively.
pub fn parse_timezone(name: &str) -> Result<Tz, AggregationError> {
    let trimmed = name.trim();
    if trimmed.eq_ignore_ascii_case("utc") {
        return Ok(chrono_tz::UTC);
    }
    trimmed
        .parse::<Tz>()
        .map_err(|_| AggregationError::UnknownTimezone(name.to_string()))
}
