//! Directional targets - which day extreme gets hit first

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::precision::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPrediction {
    Bullish,
    Bearish,
}

/// Probability split between reaching the high or the low first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetProbabilities {
    pub bullish: f64,
    pub bearish: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalTargets {
    /// Day high
    pub bullish_target: f64,
    /// Day low
    pub bearish_target: f64,
    pub distance_to_high: f64,
    pub distance_to_low: f64,
    pub first_target_prediction: TargetPrediction,
    /// 0.0 at the day low, 1.0 at the day high
    pub position_in_range: f64,
    pub probabilities: TargetProbabilities,
}

pub fn analyze(current_price: f64, day_high: f64, day_low: f64) -> DirectionalTargets {
    let distance_to_high = day_high - current_price;
    let distance_to_low = current_price - day_low;

    // Closer extreme wins; a tie goes bearish
    let first_target_prediction = if distance_to_high < distance_to_low {
        TargetPrediction::Bullish
    } else {
        TargetPrediction::Bearish
    };

    let range = day_high - day_low;
    let position_in_range = if range == 0.0 {
        0.5
    } else {
        (current_price - day_low) / range
    };

    let probabilities = TargetProbabilities {
        bullish: round_dp(1.0 - position_in_range, 3),
        bearish: round_dp(position_in_range, 3),
    };

    debug!(
        "Targets: high {} (+{:.2}), low {} (-{:.2}), first {:?}",
        day_high, distance_to_high, day_low, distance_to_low, first_target_prediction
    );

    DirectionalTargets {
        bullish_target: day_high,
        bearish_target: day_low,
        distance_to_high: round_dp(distance_to_high, 2),
        distance_to_low: round_dp(distance_to_low, 2),
        first_target_prediction,
        position_in_range: round_dp(position_in_range, 3),
        probabilities,
    }
}
