//! Bollinger Band imbalance between the premarket and the prior close
//!
//! An expanding top band together with a contracting bottom band reads as
//! bullish pressure, and the reverse as bearish pressure.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::precision::round_dp;
use crate::snapshot::BollingerBands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImbalanceDirection {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImbalanceStrength {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceAnalysis {
    pub premarket_bbt_1h: f64,
    pub premarket_bbb_1h: f64,
    pub market_close_bbt_1h: f64,
    pub market_close_bbb_1h: f64,
    pub bbt_ratio: f64,
    pub bbb_ratio: f64,
    pub imbalance_direction: ImbalanceDirection,
    pub strength: ImbalanceStrength,
}

pub fn analyze(bands: &BollingerBands) -> ImbalanceAnalysis {
    let bbt_ratio = ratio(bands.premarket_bbt_1h, bands.market_close_bbt_1h);
    let bbb_ratio = ratio(bands.premarket_bbb_1h, bands.market_close_bbb_1h);

    let (imbalance_direction, strength) = classify(bbt_ratio, bbb_ratio);

    debug!(
        "Imbalance {:?}/{:?}: bbt_ratio={:.3}, bbb_ratio={:.3}",
        imbalance_direction, strength, bbt_ratio, bbb_ratio
    );

    ImbalanceAnalysis {
        premarket_bbt_1h: bands.premarket_bbt_1h,
        premarket_bbb_1h: bands.premarket_bbb_1h,
        market_close_bbt_1h: bands.market_close_bbt_1h,
        market_close_bbb_1h: bands.market_close_bbb_1h,
        bbt_ratio: round_dp(bbt_ratio, 3),
        bbb_ratio: round_dp(bbb_ratio, 3),
        imbalance_direction,
        strength,
    }
}

/// Band ratio, 1.0 when the reference level is missing
fn ratio(premarket: f64, market_close: f64) -> f64 {
    if market_close == 0.0 {
        1.0
    } else {
        premarket / market_close
    }
}

/// First matching rule wins, strongest first
fn classify(bbt_ratio: f64, bbb_ratio: f64) -> (ImbalanceDirection, ImbalanceStrength) {
    if bbt_ratio > 1.05 && bbb_ratio < 0.95 {
        (ImbalanceDirection::StrongBullish, ImbalanceStrength::High)
    } else if bbt_ratio > 1.02 && bbb_ratio < 0.98 {
        (ImbalanceDirection::Bullish, ImbalanceStrength::Moderate)
    } else if bbt_ratio < 0.95 && bbb_ratio > 1.05 {
        (ImbalanceDirection::StrongBearish, ImbalanceStrength::High)
    } else if bbt_ratio < 0.98 && bbb_ratio > 1.02 {
        (ImbalanceDirection::Bearish, ImbalanceStrength::Moderate)
    } else {
        (ImbalanceDirection::Neutral, ImbalanceStrength::Low)
    }
}
