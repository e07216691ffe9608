//! Decimal money helpers for prices and order totals.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced when parsing a user-entered amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Input was blank.
    #[error("amount is required")]
    Empty,
    /// Input was not a decimal number.
    #[error("{0:?} is not a valid amount")]
    Invalid(String),
}

/// Parse an amount typed into a form.
///
/// Accepts an optional leading `$` and thousands separators.
///
/// # Errors
///
/// Returns [`MoneyError`] when the input is blank or not a number.
pub fn parse_money(raw: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(MoneyError::Empty);
    }
    cleaned
        .parse::<Decimal>()
        .map_err(|_| MoneyError::Invalid(raw.trim().to_owned()))
}

/// Format an amount with two decimal places, e.g. `$1234.50` or `-$3.00`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Total for a single order line, `None` when it does not fit a `Decimal`.
#[must_use]
pub fn line_total(quantity: i64, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// Sum of line totals over `(quantity, unit_price)` pairs.
///
/// Returns `None` as soon as a line or the running sum overflows.
#[must_use]
pub fn order_total(lines: impl IntoIterator<Item = (i64, Decimal)>) -> Option<Decimal> {
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, (quantity, price)| {
            sum.checked_add(line_total(quantity, price)?)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parses_form_amounts() {
        assert_eq!(parse_money("12.5").unwrap(), Decimal::from_str("12.5").unwrap());
        assert_eq!(parse_money(" $1,200.00 ").unwrap(), Decimal::from(1200));
        assert_eq!(parse_money(""), Err(MoneyError::Empty));
        assert!(matches!(parse_money("ten"), Err(MoneyError::Invalid(_))));
    }

    #[test]
    fn test_formats_two_places() {
        assert_eq!(format_money(Decimal::from_str("3.5").unwrap()), "$3.50");
        assert_eq!(format_money(Decimal::from_str("-2.005").unwrap()), "-$2.00");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_multiplies_line_totals() {
        let total = line_total(3, Decimal::from_str("2.25").unwrap());
        assert_eq!(total, Some(Decimal::from_str("6.75").unwrap()));
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let price = Decimal::from_str("99999999999999999999").unwrap();
        assert_eq!(line_total(i64::MAX, price), None);
    }

    #[test]
    fn test_order_total_sums_and_detects_overflow() {
        let total = order_total([(2, Decimal::new(250, 2)), (1, Decimal::from(10))]);
        assert_eq!(total, Some(Decimal::from(15)));
        assert_eq!(order_total(std::iter::empty()), Some(Decimal::ZERO));

        let near_max = (1, Decimal::MAX);
        assert_eq!(order_total([near_max, near_max]), None);
    }
}
