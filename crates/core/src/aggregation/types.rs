//! Transaction input records and derived aggregates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, TransactionId};

use super::error::AggregationError;

/// Direction of money movement as reported by the bank adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money spent.
    Debit,
    /// Money received.
    Credit,
    /// Money returned for an earlier debit; counts as received.
    Refund,
}

impl TransactionType {
    /// Returns true for types that count as money received.
    #[must_use]
    pub const fn is_inflow(self) -> bool {
        matches!(self, Self::Credit | Self::Refund)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
            Self::Refund => write!(f, "refund"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            "refund" => Ok(Self::Refund),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// A transaction as retrieved from storage.
///
/// The engine only reads `timestamp`, `amount`, and `transaction_type`. Every other
/// field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Linked account the transaction belongs to.
    pub account_id: AccountId,
    /// RFC 3339 instant, normally UTC (`2025-12-01T10:00:00.000Z`).
    pub timestamp: String,
    /// Signed amount. Only its magnitude is used for aggregation.
    pub amount: Decimal,
    /// Debit, credit, or refund.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// ISO 4217 code reported by the bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Merchant or counterparty name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    /// Settlement status (pending, completed, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Adapter-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_meta: Option<serde_json::Value>,
    /// Record creation time in storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Record update time in storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Transaction {
    /// Creates a transaction with only the fields aggregation reads.
    #[must_use]
    pub fn new(
        id: impl Into<TransactionId>,
        account_id: impl Into<AccountId>,
        timestamp: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            timestamp: timestamp.into(),
            amount,
            transaction_type,
            currency: None,
            merchant_name: None,
            status: None,
            raw_meta: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Aggregate of all transactions on one local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    /// Bucket key.
    pub date: NaiveDate,
    /// Net movement for the day: `credit_total - debit_total`.
    pub total: Decimal,
    /// Number of transactions in the bucket.
    pub count: usize,
    /// Sum of magnitudes of credits and refunds. Never negative.
    pub credit_total: Decimal,
    /// Sum of magnitudes of debits. Never negative.
    pub debit_total: Decimal,
}

/// Day buckets ordered by date.
pub type DayTotals = BTreeMap<NaiveDate, DayTotal>;

impl DayTotal {
    /// Creates an empty bucket for `date`.
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total: Decimal::ZERO,
            count: 0,
            credit_total: Decimal::ZERO,
            debit_total: Decimal::ZERO,
        }
    }

    /// Adds one transaction to the bucket.
    ///
    /// On overflow the bucket is left unchanged.
    pub fn record(
        &mut self,
        transaction_type: TransactionType,
        amount: Decimal,
    ) -> Result<(), AggregationError> {
        let magnitude = amount.abs();
        let (credit, debit) = if transaction_type.is_inflow() {
            (self.checked(self.credit_total.checked_add(magnitude))?, self.debit_total)
        } else {
            (self.credit_total, self.checked(self.debit_total.checked_add(magnitude))?)
        };
        self.apply(credit, debit, self.count + 1)
    }

    /// Folds another bucket for the same date into this one.
    ///
    /// On overflow the bucket is left unchanged.
    pub fn merge(&mut self, other: &Self) -> Result<(), AggregationError> {
        debug_assert_eq!(self.date, other.date);
        let credit = self.checked(self.credit_total.checked_add(other.credit_total))?;
        let debit = self.checked(self.debit_total.checked_add(other.debit_total))?;
        self.apply(credit, debit, self.count + other.count)
    }

    fn apply(&mut self, credit: Decimal, debit: Decimal, count: usize) -> Result<(), AggregationError> {
        self.total = self.checked(credit.checked_sub(debit))?;
        self.credit_total = credit;
        self.debit_total = debit;
        self.count = count;
        Ok(())
    }

    fn checked(&self, sum: Option<Decimal>) -> Result<Decimal, AggregationError> {
        sum.ok_or(AggregationError::Overflow { date: self.date })
    }
}

/// Reduction of a set of day buckets, normally one month's worth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Sum of `debit_total` across buckets.
    pub total_spent: Decimal,
    /// Sum of `credit_total` across buckets.
    pub total_received: Decimal,
    /// `total_received - total_spent`.
    pub net: Decimal,
    /// Sum of `count` across buckets.
    pub transaction_count: usize,
}

impl MonthSummary {
    /// Folds one bucket into the summary.
    ///
    /// On overflow the summary is left unchanged.
    pub fn add_day(&mut self, day: &DayTotal) -> Result<(), AggregationError> {
        let overflow = || AggregationError::Overflow { date: day.date };
        let spent = self.total_spent.checked_add(day.debit_total).ok_or_else(overflow)?;
        let received = self.total_received.checked_add(day.credit_total).ok_or_else(overflow)?;
        self.net = received.checked_sub(spent).ok_or_else(overflow)?;
        self.total_spent = spent;
        self.total_received = received;
        self.transaction_count += day.count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    #[test]
    fn test_inflow_classification() {
        assert!(TransactionType::Credit.is_inflow());
        assert!(TransactionType::Refund.is_inflow());
        assert!(!TransactionType::Debit.is_inflow());
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!(
            TransactionType::from_str("REFUND").unwrap(),
            TransactionType::Refund
        );
        assert!(TransactionType::from_str("transfer").is_err());
        assert_eq!(TransactionType::Debit.to_string(), "debit");
    }

    #[test]
    fn test_record_uses_magnitude_and_type() {
        let mut day = DayTotal::empty(date(1));
        day.record(TransactionType::Debit, dec!(-25.50)).unwrap();
        day.record(TransactionType::Credit, dec!(1200.00)).unwrap();
        day.record(TransactionType::Refund, dec!(-4.50)).unwrap();

        assert_eq!(day.count, 3);
        assert_eq!(day.credit_total, dec!(1204.50));
        assert_eq!(day.debit_total, dec!(25.50));
        assert_eq!(day.total, dec!(1179.00));
    }

    #[test]
    fn test_credit_with_negative_sign_still_counts_as_received() {
        let mut day = DayTotal::empty(date(1));
        day.record(TransactionType::Credit, dec!(-10)).unwrap();
        assert_eq!(day.credit_total, dec!(10));
        assert_eq!(day.debit_total, dec!(0));
        assert_eq!(day.total, dec!(10));
    }

    #[test]
    fn test_merge_adds_components() {
        let mut left = DayTotal::empty(date(2));
        left.record(TransactionType::Debit, dec!(5)).unwrap();
        let mut right = DayTotal::empty(date(2));
        right.record(TransactionType::Credit, dec!(8)).unwrap();
        right.record(TransactionType::Debit, dec!(1)).unwrap();

        left.merge(&right).unwrap();
        assert_eq!(left.count, 3);
        assert_eq!(left.credit_total, dec!(8));
        assert_eq!(left.debit_total, dec!(6));
        assert_eq!(left.total, dec!(2));
    }

    #[test]
    fn test_summary_from_days() {
        let mut first = DayTotal::empty(date(1));
        first.record(TransactionType::Credit, dec!(100)).unwrap();
        let mut second = DayTotal::empty(date(2));
        second.record(TransactionType::Debit, dec!(30)).unwrap();
        second.record(TransactionType::Debit, dec!(20)).unwrap();

        let mut summary = MonthSummary::default();
        summary.add_day(&first).unwrap();
        summary.add_day(&second).unwrap();
        assert_eq!(summary.total_received, dec!(100));
        assert_eq!(summary.total_spent, dec!(50));
        assert_eq!(summary.net, dec!(50));
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn test_record_overflow_is_an_error() {
        let mut day = DayTotal::empty(date(1));
        day.record(TransactionType::Debit, Decimal::MAX).unwrap();
        let err = day.record(TransactionType::Debit, Decimal::MAX).unwrap_err();

        assert!(matches!(err, AggregationError::Overflow { date: d } if d == date(1)));
        assert_eq!(day.count, 1);
        assert_eq!(day.debit_total, Decimal::MAX);
        assert_eq!(day.total, -Decimal::MAX);
    }

    #[test]
    fn test_merge_and_summary_overflow_are_errors() {
        let mut left = DayTotal::empty(date(4));
        left.record(TransactionType::Credit, Decimal::MAX).unwrap();
        let right = left.clone();
        assert!(left.merge(&right).is_err());
        assert_eq!(left.count, 1);

        let mut other_day = DayTotal::empty(date(5));
        other_day.record(TransactionType::Credit, Decimal::ONE).unwrap();
        let mut summary = MonthSummary::default();
        summary.add_day(&left).unwrap();
        assert!(matches!(
            summary.add_day(&other_day),
            Err(AggregationError::Overflow { date: d }) if d == date(5)
        ));
        assert_eq!(summary.transaction_count, 1);
    }

    #[test]
    fn test_transaction_json_shape() {
        let json = r#"{
            "id": "1",
            "accountId": "acc-1",
            "timestamp": "2025-12-01T10:00:00.000Z",
            "amount": -25.50,
            "type": "debit",
            "currency": "INR",
            "merchantName": "Chai Point",
            "status": "completed",
            "rawMeta": {"upiRef": "XYZ"}
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id.as_str(), "1");
        assert_eq!(tx.amount, dec!(-25.50));
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(tx.merchant_name.as_deref(), Some("Chai Point"));
        assert!(tx.created_at.is_none());

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["type"], "debit");
        assert_eq!(back["accountId"], "acc-1");
        assert_eq!(back["rawMeta"]["upiRef"], "XYZ");
        assert!(back.get("updatedAt").is_none());
    }

    #[test]
    fn test_day_total_json_keys() {
        let value = serde_json::to_value(DayTotal::empty(date(3))).unwrap();
        assert_eq!(value["date"], "2025-12-03");
        assert!(value.get("creditTotal").is_some());
        assert!(value.get("debitTotal").is_some());
    }
}
