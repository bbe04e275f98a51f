//! Text and JSON rendering of aggregates.

use std::collections::BTreeMap;

use serde::Serialize;
use tally_core::{DayTotals, MonthBounds, MonthKey, MonthSummary, Transaction, format_currency};
use tally_shared::types::Currency;
use tally_shared::{AppError, AppResult};

/// Month summary with the context it was computed in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport<'a> {
    /// Month summarized (`YYYY-MM`).
    pub month: String,
    /// IANA timezone the month boundaries were taken in.
    pub timezone: String,
    /// First local instant of the month.
    pub from: String,
    /// Last local instant of the month.
    pub to: String,
    /// The totals.
    #[serde(flatten)]
    pub summary: &'a MonthSummary,
}

impl<'a> SummaryReport<'a> {
    pub fn new(month: MonthKey, bounds: &MonthBounds, summary: &'a MonthSummary) -> Self {
        Self {
            month: month.to_string(),
            timezone: bounds.start.timezone().name().to_string(),
            from: bounds.start.to_rfc3339(),
            to: bounds.end.to_rfc3339(),
            summary,
        }
    }
}

/// Error written to stderr in JSON mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Stable machine-readable code, e.g. `INVALID_MONTH`.
    pub error: &'static str,
    /// Human-readable message including context.
    pub message: String,
    /// Process exit code.
    pub exit_code: u8,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Internal(err.to_string()))
}

pub fn days_table(days: &DayTotals, currency: Currency) -> String {
    let mut out = format!(
        "{:<10}  {:>5}  {:>16}  {:>16}  {:>16}\n",
        "DATE", "COUNT", "RECEIVED", "SPENT", "NET"
    );
    for day in days.values() {
        out.push_str(&format!(
            "{:<10}  {:>5}  {:>16}  {:>16}  {:>16}\n",
            day.date.format("%Y-%m-%d"),
            day.count,
            format_currency(day.credit_total, currency),
            format_currency(day.debit_total, currency),
            format_currency(day.total, currency),
        ));
    }
    out
}

pub fn summary_text(report: &SummaryReport<'_>, currency: Currency) -> String {
    let summary = report.summary;
    format!(
        "Month:        {} ({})\n\
         Range:        {} .. {}\n\
         Transactions: {}\n\
         Received:     {}\n\
         Spent:        {}\n\
         Net:          {}\n",
        report.month,
        report.timezone,
        report.from,
        report.to,
        summary.transaction_count,
        format_currency(summary.total_received, currency),
        format_currency(summary.total_spent, currency),
        format_currency(summary.net, currency),
    )
}

pub fn months_table(months: &BTreeMap<MonthKey, MonthSummary>, currency: Currency) -> String {
    let mut out = format!(
        "{:<7}  {:>5}  {:>16}  {:>16}  {:>16}\n",
        "MONTH", "COUNT", "RECEIVED", "SPENT", "NET"
    );
    for (month, summary) in months {
        out.push_str(&format!(
            "{:<7}  {:>5}  {:>16}  {:>16}  {:>16}\n",
            month.to_string(),
            summary.transaction_count,
            format_currency(summary.total_received, currency),
            format_currency(summary.total_spent, currency),
            format_currency(summary.net, currency),
        ));
    }
    out
}

/// Lists transactions. Amounts use the transaction's own currency when it is
/// one we can format, otherwise `fallback`.
pub fn transactions_table(transactions: &[&Transaction], fallback: Currency) -> String {
    let mut out = format!(
        "{:<12}  {:<24}  {:<6}  {:>16}  {}\n",
        "ID", "TIMESTAMP", "TYPE", "AMOUNT", "MERCHANT"
    );
    for tx in transactions {
        let currency = tx
            .currency
            .as_deref()
            .and_then(|code| code.parse().ok())
            .unwrap_or(fallback);
        out.push_str(&format!(
            "{:<12}  {:<24}  {:<6}  {:>16}  {}\n",
            tx.id.as_str(),
            tx.timestamp,
            tx.transaction_type.to_string(),
            format_currency(tx.amount, currency),
            tx.merchant_name.as_deref().unwrap_or("-"),
        ));
    }
    out
}
