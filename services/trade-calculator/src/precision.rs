//! Decimal rounding for reported figures

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `dp` decimal places, half away from zero.
///
/// Goes through `Decimal` so that e.g. 171.89 - 163.87 reports as 8.02
/// rather than 8.019999999999982.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}

const MAX_PRICE_DP: u32 = 28;

/// Decimal places for price levels: cents from 1.0 up, four significant
/// digits below that
pub fn price_dp(reference: f64) -> u32 {
    let magnitude = reference.abs();
    if !magnitude.is_finite() || magnitude >= 1.0 || magnitude == 0.0 {
        return 2;
    }
    let leading_zeros = -magnitude.log10().floor();
    (leading_zeros as u32 + 3).min(MAX_PRICE_DP)
}

/// Price level rounded to `dp` places; `None` outside `Decimal` range
pub fn to_price(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}
