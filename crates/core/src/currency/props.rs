//! Property-based tests for currency formatting.
//!
//! - Formatting is deterministic
//! - Stripping symbol and separators recovers the rounded amount
//! - The sign of the output matches the sign of the rounded amount

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::types::Currency;

use super::format::format_currency;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_MANTISSA: i128 = (1 << 96) - 1;

/// Strategy to generate amounts: everyday values with up to 4 decimal places,
/// plus values spread over the whole `Decimal` range.
fn amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (-100_000_000_000i64..100_000_000_000i64).prop_map(|v| Decimal::new(v, 4)),
        (-MAX_MANTISSA..=MAX_MANTISSA, 0u32..=6)
            .prop_map(|(v, scale)| Decimal::from_i128_with_scale(v, scale)),
    ]
}

fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::Inr),
        Just(Currency::Usd),
        Just(Currency::Eur),
        Just(Currency::Gbp),
        Just(Currency::Sgd),
        Just(Currency::Jpy),
        Just(Currency::Idr),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same input, same string.
    #[test]
    fn prop_format_is_deterministic(value in amount(), cur in currency()) {
        prop_assert_eq!(format_currency(value, cur), format_currency(value, cur));
    }

    /// The displayed digits are the amount rounded half-to-even at two places.
    #[test]
    fn prop_format_recovers_rounded_value(value in amount(), cur in currency()) {
        let text = format_currency(value, cur);
        let negative = text.starts_with('-');
        let unsigned = text.trim_start_matches('-');
        prop_assert!(unsigned.starts_with(cur.symbol()));

        let (integer, fraction) = unsigned[cur.symbol().len()..].split_once('.').unwrap();
        let integer: Decimal = integer.replace(',', "").parse().unwrap();
        let cents: Decimal = fraction.parse().unwrap();

        let expected = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            .abs();
        prop_assert_eq!(integer, expected.trunc());
        prop_assert_eq!(cents, expected.fract() * Decimal::ONE_HUNDRED);
        prop_assert_eq!(negative, !expected.is_zero() && value.is_sign_negative());
    }

    /// Always exactly two fraction digits.
    #[test]
    fn prop_two_fraction_digits(value in amount(), cur in currency()) {
        let text = format_currency(value, cur);
        let (_, fraction) = text.rsplit_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 2);
    }

    /// A minus sign appears only when the rounded amount is below zero.
    #[test]
    fn prop_sign_matches_rounded_amount(value in amount(), cur in currency()) {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let text = format_currency(value, cur);
        prop_assert_eq!(text.starts_with('-'), rounded < Decimal::ZERO);
    }
}
