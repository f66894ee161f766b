//! Money parsing for price-list cells.
//!
//! Price lists are maintained by hand in a spreadsheet, so cells arrive as display text:
//! `"R$ 45,00"`, `"R$ 1.234,56"`, `"12.50"` or a bare `"45"`.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rounds a money value to cents, halves away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a textual price into a decimal.
///
/// A leading currency marker is ignored. When both `,` and `.` appear, the one that comes
/// last is the decimal separator and the other groups thousands; a lone `,` is a decimal comma.
/// After a currency marker, dots that only split off groups of three digits are thousands
/// separators too, so `"R$ 1.234"` is 1234 while a bare `"1.234"` stays 1.234.
///
/// # Errors
/// Returns [`Error::PriceFormat`] when no number can be read from `raw`.
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let format_error = || Error::PriceFormat {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim();
    let number = trimmed
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-')
        .trim();
    let has_marker = number.len() < trimmed.len();

    if number.is_empty()
        || !number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
    {
        return Err(format_error());
    }

    let normalized = match (number.rfind(','), number.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => number.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => number.replace(',', ""),
        (Some(_), None) => number.replace(',', "."),
        (None, Some(_)) if has_marker && groups_thousands(number) => number.replace('.', ""),
        _ => number.to_string(),
    };

    Decimal::from_str(&normalized).map_err(|_| format_error())
}

/// `1.234` or `12.345.678`: every group after the first has exactly three digits.
fn groups_thousands(number: &str) -> bool {
    number
        .split('.')
        .skip(1)
        .all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_price_with_currency_and_decimal_comma() {
        assert_eq!(parse_price("R$ 12,50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price("R$ 45,00").unwrap(), Decimal::new(45, 0));
    }

    #[test]
    fn test_parse_price_with_thousands_separator() {
        assert_eq!(parse_price("R$ 1.234,56").unwrap(), Decimal::new(123_456, 2));
        assert_eq!(parse_price("1,234.56").unwrap(), Decimal::new(123_456, 2));
    }

    #[test]
    fn test_parse_price_dot_thousands_after_currency() {
        assert_eq!(parse_price("R$ 1.234").unwrap(), Decimal::new(1234, 0));
        assert_eq!(parse_price("R$ 1.234.567").unwrap(), Decimal::new(1_234_567, 0));
        assert_eq!(parse_price("R$ 12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price("1.234").unwrap(), Decimal::new(1234, 3));
    }

    #[test]
    fn test_parse_price_plain_numbers() {
        assert_eq!(parse_price("45").unwrap(), Decimal::new(45, 0));
        assert_eq!(parse_price(" 12.5 ").unwrap(), Decimal::new(125, 1));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        for raw in ["", "R$", "abc", "12 reais", "1.2.3"] {
            assert!(
                matches!(parse_price(raw), Err(Error::PriceFormat { .. })),
                "expected PriceFormat for {raw:?}"
            );
        }
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(12_345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_money(Decimal::new(2550, 2)), Decimal::new(2550, 2));
    }
}
