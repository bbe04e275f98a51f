//! Currency display formatting.
//!
//! Rounding strategy:
//! - Always exactly two fraction digits, whatever the currency
//! - Banker's rounding (round half to even), as everywhere else money is rounded
//! - An amount that rounds to zero is shown unsigned

use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::types::{Currency, DigitGrouping, Money};

use crate::aggregation::AggregationError;

/// Fraction digits shown for every currency.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Formats `money` for display, e.g. `-$1,234.56` or `₹12,34,567.00`.
///
/// The minus sign precedes the currency symbol.
#[must_use]
pub fn format_money(money: &Money) -> String {
    let mut rounded = money
        .amount
        .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    rounded.set_sign_positive(true);
    // Near the top of the range `rescale` settles for fewer places.
    rounded.rescale(DISPLAY_DECIMAL_PLACES);
    let digits = rounded.to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    format!(
        "{sign}{symbol}{integer}.{fraction:0<width$}",
        sign = if negative { "-" } else { "" },
        symbol = money.currency.symbol(),
        integer = group_digits(integer, money.currency.grouping()),
        width = DISPLAY_DECIMAL_PLACES as usize,
    )
}

/// Formats `amount` in `currency`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tally_core::format_currency;
/// use tally_shared::types::Currency;
///
/// assert_eq!(format_currency(dec!(1234.56), Currency::Usd), "$1,234.56");
/// assert_eq!(format_currency(dec!(-1234.56), Currency::Usd), "-$1,234.56");
/// ```
#[must_use]
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    format_money(&Money::new(amount, currency))
}

/// Formats `amount` in the currency named by an ISO 4217 code.
pub fn format_currency_code(amount: Decimal, code: &str) -> Result<String, AggregationError> {
    let currency: Currency = code
        .parse()
        .map_err(|_| AggregationError::UnknownCurrency(code.to_string()))?;
    Ok(format_currency(amount, currency))
}

/// Inserts `,` separators into a run of ASCII digits.
fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && starts_group(remaining, grouping) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn starts_group(remaining: usize, grouping: DigitGrouping) -> bool {
    match grouping {
        DigitGrouping::Thousands => remaining % 3 == 0,
        DigitGrouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
    }
}
