//! Aggregation engine: daily buckets, month summaries, and date/month filters.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use rayon::prelude::*;

use super::error::AggregationError;
use super::types::{DayTotal, DayTotals, MonthSummary, Transaction};
use crate::calendar::{
    Clock, MonthBounds, MonthKey, SystemClock, date_key, local_date, parse_date_key,
    parse_timestamp, parse_timezone,
};

/// Stateless aggregation over caller-supplied transactions.
///
/// The engine owns only its timezone and clock. Every call recomputes from the
/// input; nothing is cached between calls, and inputs are never modified.
#[derive(Clone)]
pub struct AggregationEngine {
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AggregationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationEngine")
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}

impl AggregationEngine {
    /// Creates an engine bucketing in `tz` and reading the system clock.
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self::with_clock(tz, Arc::new(SystemClock))
    }

    /// Creates an engine with an explicit clock.
    #[must_use]
    pub fn with_clock(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { tz, clock }
    }

    /// Creates an engine from an IANA timezone name.
    pub fn for_timezone(name: &str) -> Result<Self, AggregationError> {
        parse_timezone(name).map(Self::new)
    }

    /// Timezone used to derive calendar dates.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current month in the engine's timezone.
    #[must_use]
    pub fn current_month(&self) -> MonthKey {
        MonthKey::containing(local_date(self.clock.now(), self.tz))
    }

    /// The current month as `YYYY-MM`.
    #[must_use]
    pub fn current_month_iso(&self) -> String {
        self.current_month().to_string()
    }

    /// Local calendar date of an RFC 3339 timestamp.
    pub fn local_date(&self, timestamp: &str) -> Result<NaiveDate, AggregationError> {
        parse_timestamp(timestamp).map(|instant| local_date(instant, self.tz))
    }

    /// Local calendar date of an RFC 3339 timestamp as `YYYY-MM-DD`.
    pub fn local_date_key(&self, timestamp: &str) -> Result<String, AggregationError> {
        self.local_date(timestamp).map(date_key)
    }

    /// Buckets transactions by local calendar date.
    ///
    /// Only dates that occur in the input get a bucket. A single malformed
    /// timestamp fails the whole call.
    pub fn group_by_day(&self, transactions: &[Transaction]) -> Result<DayTotals, AggregationError> {
        let mut buckets = DayTotals::new();
        for transaction in transactions {
            self.accumulate(&mut buckets, transaction)?;
        }
        Ok(buckets)
    }

    /// Same result as [`Self::group_by_day`], computed on the rayon thread pool.
    pub fn group_by_day_parallel(
        &self,
        transactions: &[Transaction],
    ) -> Result<DayTotals, AggregationError> {
        transactions
            .par_iter()
            .try_fold(DayTotals::new, |mut buckets, transaction| {
                self.accumulate(&mut buckets, transaction)?;
                Ok(buckets)
            })
            .try_reduce(DayTotals::new, |mut left, right| {
                merge_buckets(&mut left, right)?;
                Ok(left)
            })
    }

    /// Reduces day buckets to a summary.
    ///
    /// Does not filter: the summary covers every bucket passed in. Use
    /// [`Self::month_summary`] to restrict to one month. Fails only if a sum
    /// overflows `Decimal`.
    pub fn summarize(day_totals: &DayTotals) -> Result<MonthSummary, AggregationError> {
        day_totals
            .values()
            .try_fold(MonthSummary::default(), |mut summary, day| {
                summary.add_day(day)?;
                Ok(summary)
            })
    }

    /// Summary of the transactions that fall in `month` (`YYYY-MM`).
    pub fn month_summary(
        &self,
        transactions: &[Transaction],
        month: &str,
    ) -> Result<MonthSummary, AggregationError> {
        let mut buckets = DayTotals::new();
        for transaction in self.transactions_in_month(transactions, month)? {
            self.accumulate(&mut buckets, transaction)?;
        }
        Self::summarize(&buckets)
    }

    /// Per-month summaries for every month present in the input.
    pub fn group_by_month(
        &self,
        transactions: &[Transaction],
    ) -> Result<BTreeMap<MonthKey, MonthSummary>, AggregationError> {
        let mut months: BTreeMap<MonthKey, MonthSummary> = BTreeMap::new();
        for day in self.group_by_day(transactions)?.values() {
            months
                .entry(MonthKey::containing(day.date))
                .or_default()
                .add_day(day)?;
        }
        Ok(months)
    }

    /// Transactions on local date `date` (`YYYY-MM-DD`), most recent first.
    ///
    /// Transactions with identical instants keep their input order.
    pub fn transactions_on<'a>(
        &self,
        transactions: &'a [Transaction],
        date: &str,
    ) -> Result<Vec<&'a Transaction>, AggregationError> {
        let target = parse_date_key(date)?;

        let mut matches = Vec::new();
        for transaction in transactions {
            let instant = parse_timestamp(&transaction.timestamp)?;
            if local_date(instant, self.tz) == target {
                matches.push((instant, transaction));
            }
        }
        matches.sort_by(|(a, _), (b, _)| b.cmp(a));

        Ok(matches.into_iter().map(|(_, transaction)| transaction).collect())
    }

    /// Transactions within `month` (`YYYY-MM`), in input order.
    ///
    /// A transaction is included when its local calendar date falls in the
    /// month. At millisecond precision this matches the inclusive window
    /// `first day 00:00:00.000` through `last day 23:59:59.999`; finer stamps
    /// late on the last day still count.
    pub fn transactions_in_month<'a>(
        &self,
        transactions: &'a [Transaction],
        month: &str,
    ) -> Result<Vec<&'a Transaction>, AggregationError> {
        let month: MonthKey = month.parse()?;

        let mut matches = Vec::new();
        for transaction in transactions {
            if month.contains(self.local_date(&transaction.timestamp)?) {
                matches.push(transaction);
            }
        }
        Ok(matches)
    }

    /// Local-time bounds of `month` (`YYYY-MM`) in the engine's timezone.
    pub fn month_bounds(&self, month: &str) -> Result<MonthBounds, AggregationError> {
        month.parse::<MonthKey>().map(|key| key.bounds(self.tz))
    }

    fn accumulate(
        &self,
        buckets: &mut DayTotals,
        transaction: &Transaction,
    ) -> Result<(), AggregationError> {
        let date = self.local_date(&transaction.timestamp)?;
        buckets
            .entry(date)
            .or_insert_with(|| DayTotal::empty(date))
            .record(transaction.transaction_type, transaction.amount)
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

fn merge_buckets(into: &mut DayTotals, from: DayTotals) -> Result<(), AggregationError> {
    for (date, day) in from {
        match into.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(day);
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(&day)?,
        }
    }
    Ok(())
}
