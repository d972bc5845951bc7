//! Common utility functions for tax calculations.
//!
//! Rounding and input checks shared by every entry point.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Decimal places for monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places for effective rates.
pub const RATE_DP: u32 = 6;

/// Rounds a monetary value to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("123.455").unwrap()), Decimal::from_str("123.46").unwrap());
/// assert_eq!(round_money(Decimal::from_str("123.454").unwrap()), Decimal::from_str("123.45").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `tax / base` rounded to [`RATE_DP`] places, or zero when the base is zero.
pub fn effective_rate(tax: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    (tax / base).round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest accepted input amount.
///
/// Sums of a handful of inputs at this size stay well inside `Decimal`'s range.
pub fn max_amount() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(20), 0)
}

/// Rejects negative amounts and amounts above [`max_amount`].
pub(crate) fn require_non_negative(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    if value > max_amount() {
        return Err(EngineError::invalid_input(
            field,
            format!("must not exceed {}, got {}", max_amount(), value),
        ));
    }
    Ok(value)
}

/// Rejects a negative optional amount.
pub(crate) fn require_non_negative_opt(
    field: &str,
    value: Option<Decimal>,
) -> EngineResult<Option<Decimal>> {
    value.map(|v| require_non_negative(field, v)).transpose()
}
