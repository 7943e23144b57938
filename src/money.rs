//! Minor-unit currency conversion.
//!
//! All amounts are stored and summed as integer cents (`i64`). Decimal
//! major-unit input is converted exactly once, at the write boundary, so no
//! floating-point value ever reaches the database or the aggregation queries.

use crate::error::AppError;

/// Convert a decimal major-unit amount (e.g. `25.99`) into integer cents.
///
/// Rounding is half-away-from-zero, so `0.005` becomes `1` and inputs with
/// more than two fractional digits are rounded rather than rejected.
///
/// Multiplying by `100.0` and rounding the float would lose the half-cent
/// cases: the nearest f64 to `1.005` is `1.00499999999999989…`, whose product
/// with 100 sits just below the midpoint. Rounding the shortest decimal form
/// of the value instead recovers the digits the client actually sent.
///
/// # Errors
///
/// Returns a validation error when the value is not finite, not positive, or
/// too large to represent as `i64` cents.
pub fn dollars_to_cents(value: f64) -> Result<i64, AppError> {
    if !value.is_finite() {
        return Err(AppError::invalid("amount", "amount must be a number"));
    }
    if value <= 0.0 {
        return Err(AppError::invalid("amount", "amount must be positive"));
    }

    let text = format!("{value}");
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let too_large = || AppError::invalid("amount", "amount is too large");
    let whole: i64 = whole.parse().map_err(|_| too_large())?;

    let mut frac_digits = frac.bytes().map(|digit| i64::from(digit - b'0'));
    let tenths = frac_digits.next().unwrap_or(0);
    let hundredths = frac_digits.next().unwrap_or(0);
    let mut cents = whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(tenths * 10 + hundredths))
        .ok_or_else(too_large)?;
    // Half a cent or more left over rounds away from zero.
    if frac_digits.next().is_some_and(|digit| digit >= 5) {
        cents = cents.checked_add(1).ok_or_else(too_large)?;
    }

    Ok(cents)
}

/// Convert integer cents back to a decimal major-unit amount for display.
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_two_decimal_amounts_exactly() {
        assert_eq!(dollars_to_cents(25.99).unwrap(), 2599);
        assert_eq!(dollars_to_cents(0.01).unwrap(), 1);
        assert_eq!(dollars_to_cents(100.0).unwrap(), 10000);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // Exact halves go up even where the float product lands below the
        // midpoint.
        assert_eq!(dollars_to_cents(0.005).unwrap(), 1);
        assert_eq!(dollars_to_cents(1.005).unwrap(), 101);
        assert_eq!(dollars_to_cents(2.675).unwrap(), 268);
    }

    #[test]
    fn rounds_below_half_down() {
        assert_eq!(dollars_to_cents(1.0049).unwrap(), 100);
        assert_eq!(dollars_to_cents(2.6749).unwrap(), 267);
        assert_eq!(dollars_to_cents(1.0151).unwrap(), 102);
    }

    #[test]
    fn round_trips_all_two_decimal_values_up_to_100() {
        // Every representable value with <=2 fractional digits survives the
        // cents conversion and back.
        for cents in 1..=10_000i64 {
            let dollars = cents_to_dollars(cents);
            assert_eq!(dollars_to_cents(dollars).unwrap(), cents, "value {dollars}");
        }
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(dollars_to_cents(0.0).is_err());
        assert!(dollars_to_cents(-5.25).is_err());
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(dollars_to_cents(f64::NAN).is_err());
        assert!(dollars_to_cents(f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_amounts_overflowing_i64_cents() {
        assert!(dollars_to_cents(1e18).is_err());
        assert!(dollars_to_cents(1e19).is_err());
    }
}
