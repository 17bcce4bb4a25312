use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance used for every "is this settled?" decision.
///
/// Shares are computed by division and balances accumulate across many
/// expenses, so exact comparison against zero is never used.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Returns true if `amount` is within [`EPSILON`] of zero.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::amount::is_negligible;
/// use rust_decimal_macros::dec;
///
/// assert!(is_negligible(dec!(0.0000001)));
/// assert!(!is_negligible(dec!(0.01)));
/// ```
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() < EPSILON
}

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    is_negligible(a - b)
}

/// Render an amount with exactly two decimal places.
///
/// Midpoints round away from zero, so `2.005` renders as `"2.01"`.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::amount::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(100)), "100.00");
/// assert_eq!(format_amount(dec!(33.333333)), "33.33");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}
