//! Calendar months.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::aggregation::AggregationError;

/// A validated calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first: NaiveDate,
}

/// Inclusive local-time interval covering one month in one timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBounds {
    /// First instant of the first day (00:00:00.000 local).
    pub start: DateTime<Tz>,
    /// Last millisecond of the last day (23:59:59.999 local).
    pub end: DateTime<Tz>,
}

impl MonthKey {
    /// Creates a month from its year (0000-9999) and month number (1-12).
    pub fn new(year: i32, month: u32) -> Result<Self, AggregationError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(AggregationError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| AggregationError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first + Days::new(u64::from(self.days_in_month() - 1))
    }

    /// Number of days in the month, accounting for leap years.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        match self.month() {
            2 if self.first.leap_year() => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            first: self.first + Months::new(1),
        }
    }

    /// The preceding month.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            first: self.first - Months::new(1),
        }
    }

    /// Returns true if `date` falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last_day()
    }

    /// Local-time bounds of this month in `tz`.
    #[must_use]
    pub fn bounds(self, tz: Tz) -> MonthBounds {
        let start = start_of_day(tz, self.first);
        let end = start_of_day(tz, self.next().first) - TimeDelta::milliseconds(1);
        MonthBounds { start, end }
    }
}

impl MonthBounds {
    /// Returns true if `instant` lies within the bounds, both ends inclusive.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.with_timezone(&Utc) <= instant && instant <= self.end.with_timezone(&Utc)
    }
}

/// First existing local instant of `date`.
///
/// Some zones skip midnight on DST changeover days; the day then starts at the
/// end of the gap.
fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    for minutes in 0..=180 {
        match tz.from_local_datetime(&(midnight + TimeDelta::minutes(minutes))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => return dt,
            LocalResult::None => {}
        }
    }
    tz.from_utc_datetime(&midnight)
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl std::str::FromStr for MonthKey {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AggregationError::InvalidMonth(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7
            || bytes[4] != b'-'
            || !bytes[..4].iter().all(u8::is_ascii_digit)
            || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return Err(invalid());
        }

        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rstest::rstest;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("2025-12", 2025, 12)]
    #[case("2025-01", 2025, 1)]
    #[case("0001-06", 1, 6)]
    fn test_parse_valid_month(#[case] input: &str, #[case] year: i32, #[case] number: u32) {
        let key = month(input);
        assert_eq!(key.year(), year);
        assert_eq!(key.month(), number);
        assert_eq!(key.to_string(), input);
    }

    #[rstest]
    #[case("2025-00")]
    #[case("2025-13")]
    #[case("2025-1")]
    #[case("25-12")]
    #[case("2025/12")]
    #[case("2025-12-01")]
    #[case("abcd-ef")]
    #[case("+202-12")]
    #[case("")]
    fn test_parse_invalid_month(#[case] input: &str) {
        let err = input.parse::<MonthKey>().unwrap_err();
        assert!(matches!(err, AggregationError::InvalidMonth(ref s) if s == input));
    }

    #[rstest]
    #[case("2024-02", 29)]
    #[case("2025-02", 28)]
    #[case("1900-02", 28)]
    #[case("2000-02", 29)]
    #[case("2025-04", 30)]
    #[case("2025-12", 31)]
    fn test_days_in_month(#[case] input: &str, #[case] days: u32) {
        let key = month(input);
        assert_eq!(key.days_in_month(), days);
        assert_eq!(key.last_day().day(), days);
    }

    #[test]
    fn test_next_and_previous_cross_year() {
        assert_eq!(month("2025-12").next(), month("2026-01"));
        assert_eq!(month("2026-01").previous(), month("2025-12"));
        assert_eq!(month("2025-06").next().previous(), month("2025-06"));
    }

    #[test]
    fn test_containing_and_contains() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 17).unwrap();
        let key = MonthKey::containing(date);
        assert_eq!(key, month("2025-12"));
        assert!(key.contains(date));
        assert!(key.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()));
    }

    #[test]
    fn test_months_order_chronologically() {
        let mut keys = vec![month("2026-01"), month("2025-12"), month("2025-02")];
        keys.sort();
        assert_eq!(keys, vec![month("2025-02"), month("2025-12"), month("2026-01")]);
    }

    #[test]
    fn test_bounds_in_utc() {
        let bounds = month("2025-12").bounds(chrono_tz::UTC);
        assert_eq!(bounds.start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(bounds.end.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(
            (bounds.end.hour(), bounds.end.minute(), bounds.end.second()),
            (23, 59, 59)
        );
        assert_eq!(bounds.end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_bounds_are_inclusive_to_the_millisecond() {
        let bounds = month("2025-12").bounds(chrono_tz::Asia::Kolkata);
        let start = bounds.start.with_timezone(&Utc);
        let end = bounds.end.with_timezone(&Utc);

        assert!(bounds.contains(start));
        assert!(bounds.contains(end));
        assert!(!bounds.contains(start - TimeDelta::milliseconds(1)));
        assert!(!bounds.contains(end + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn test_bounds_when_midnight_is_skipped() {
        // Sao Paulo sprang forward at 00:00 on 2018-11-04, so that day starts at 01:00.
        let tz = chrono_tz::America::Sao_Paulo;
        let start = start_of_day(tz, NaiveDate::from_ymd_opt(2018, 11, 4).unwrap());
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2018, 11, 4).unwrap());
        assert_eq!(start.hour(), 1);
    }

    #[test]
    fn test_serde_as_string() {
        let key = month("2025-12");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""2025-12""#);
        let parsed: MonthKey = serde_json::from_str(r#""2025-12""#).unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<MonthKey>(r#""2025-13""#).is_err());
    }
}
