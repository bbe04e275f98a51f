//! Display formatting for monetary amounts.

pub mod format;

#[cfg(test)]
mod props;

pub use format::{format_currency, format_currency_code, format_money};
