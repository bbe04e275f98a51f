//! Benchmark test for aggregation over large histories.

#[cfg(test)]
mod tests {
    use chrono::{SecondsFormat, TimeDelta, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::time::Instant;

    use crate::aggregation::{AggregationEngine, Transaction, TransactionType};

    /// Generate a multi-year history with several transactions per day.
    fn generate_history(count: usize) -> Vec<Transaction> {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let offset = TimeDelta::minutes(i64::try_from(i).unwrap() * 97);
                let kind = match i % 5 {
                    0 => TransactionType::Credit,
                    1 => TransactionType::Refund,
                    _ => TransactionType::Debit,
                };
                Transaction::new(
                    format!("txn-{i}"),
                    format!("acc-{}", i % 4),
                    (start + offset).to_rfc3339_opts(SecondsFormat::Millis, true),
                    Decimal::new(i64::try_from(i % 10_000).unwrap() * 7 - 35_000, 2),
                    kind,
                )
            })
            .collect()
    }

    #[test]
    fn benchmark_group_by_day_100k() {
        let engine = AggregationEngine::new(chrono_tz::Asia::Kolkata);
        let history = generate_history(100_000);

        let start = Instant::now();
        let sequential = engine.group_by_day(&history).unwrap();
        let sequential_time = start.elapsed();

        let start = Instant::now();
        let parallel = engine.group_by_day_parallel(&history).unwrap();
        let parallel_time = start.elapsed();

        println!("\n=== BENCHMARK: 100k transactions ===");
        println!("Sequential: {sequential_time:?}");
        println!("Parallel:   {parallel_time:?}");
        println!("Buckets:    {}", sequential.len());

        assert_eq!(sequential, parallel);
        assert_eq!(
            sequential.values().map(|d| d.count).sum::<usize>(),
            history.len()
        );
        assert!(
            sequential_time.as_millis() < 5000,
            "Sequential grouping took {}ms, expected <5000ms",
            sequential_time.as_millis()
        );
    }

    #[test]
    fn benchmark_month_summary_100k() {
        let engine = AggregationEngine::default();
        let history = generate_history(100_000);

        let start = Instant::now();
        let months = engine.group_by_month(&history).unwrap();
        let duration = start.elapsed();

        println!("\n=== BENCHMARK: monthly summaries over 100k transactions ===");
        println!("Duration: {duration:?}");
        println!("Months:   {}", months.len());

        assert_eq!(
            months.values().map(|m| m.transaction_count).sum::<usize>(),
            history.len()
        );
        assert!(
            duration.as_millis() < 5000,
            "Monthly summaries took {}ms, expected <5000ms",
            duration.as_millis()
        );
    }
}
