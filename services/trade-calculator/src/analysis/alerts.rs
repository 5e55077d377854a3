//! Multi-timeframe overbought alerts
//!
//! Only the 1H top band is measured. The 30m/5m/1m levels are derived from it
//! by fixed decay factors, an approximation that keeps the stage contract
//! (four flags plus a correction level) stable if real sub-hour bands are
//! ever supplied.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::precision::round_dp;
use crate::snapshot::BollingerBands;

/// Baseline used when no premarket top band is available
const DEFAULT_BASELINE_FACTOR: f64 = 1.02;
const DECAY_30M: f64 = 0.98;
const DECAY_5M: f64 = 0.96;
const DECAY_1M: f64 = 0.94;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionLevel {
    High,
    Medium,
    Low,
    Minimal,
    None,
}

impl CorrectionLevel {
    pub fn message(&self) -> &'static str {
        match self {
            CorrectionLevel::High => "Overbought on 1H - high probability of correction",
            CorrectionLevel::Medium => "Overbought on 30M - medium probability of correction",
            CorrectionLevel::Low => "Overbought on 5M - low probability of correction",
            CorrectionLevel::Minimal => "Overbought on 1M only - minimal correction expected",
            CorrectionLevel::None => "No overbought conditions detected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertAnalysis {
    pub bbt_1h: f64,
    pub bbt_30m: f64,
    pub bbt_5m: f64,
    pub bbt_1m: f64,
    pub overbought_1h: bool,
    pub overbought_30m: bool,
    pub overbought_5m: bool,
    pub overbought_1m: bool,
    pub correction_level: CorrectionLevel,
    pub message: String,
}

impl AlertAnalysis {
    /// Number of timeframes currently overbought (0 - 4)
    pub fn overbought_count(&self) -> usize {
        [
            self.overbought_1h,
            self.overbought_30m,
            self.overbought_5m,
            self.overbought_1m,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
    }
}

pub fn analyze(bands: &BollingerBands, current_price: f64) -> AlertAnalysis {
    let bbt_1h = if bands.premarket_bbt_1h == 0.0 {
        current_price * DEFAULT_BASELINE_FACTOR
    } else {
        bands.premarket_bbt_1h
    };
    let bbt_30m = bbt_1h * DECAY_30M;
    let bbt_5m = bbt_1h * DECAY_5M;
    let bbt_1m = bbt_1h * DECAY_1M;

    let overbought_1h = current_price > bbt_1h;
    let overbought_30m = current_price > bbt_30m;
    let overbought_5m = current_price > bbt_5m;
    let overbought_1m = current_price > bbt_1m;

    let correction_level = if overbought_1h {
        CorrectionLevel::High
    } else if overbought_30m {
        CorrectionLevel::Medium
    } else if overbought_5m {
        CorrectionLevel::Low
    } else if overbought_1m {
        CorrectionLevel::Minimal
    } else {
        CorrectionLevel::None
    };

    debug!(
        "Alerts: price {} vs 1H band {:.2} -> correction {:?}",
        current_price, bbt_1h, correction_level
    );

    AlertAnalysis {
        bbt_1h: round_dp(bbt_1h, 2),
        bbt_30m: round_dp(bbt_30m, 2),
        bbt_5m: round_dp(bbt_5m, 2),
        bbt_1m: round_dp(bbt_1m, 2),
        overbought_1h,
        overbought_30m,
        overbought_5m,
        overbought_1m,
        correction_level,
        message: correction_level.message().to_string(),
    }
}
