//! EMA trend analysis
//!
//! Five bullish checks over price/EMA20/EMA50/EMA200 ordering:
//! - price > EMA20, EMA20 > EMA50, EMA50 > EMA200 (the three horizons)
//! - price > EMA50, price > EMA200

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::precision::round_dp;
use crate::snapshot::Emas;

const TREND_CHECKS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
}

impl TrendDirection {
    fn from_flag(bullish: bool) -> Self {
        if bullish {
            TrendDirection::Bullish
        } else {
            TrendDirection::Bearish
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTrend {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl OverallTrend {
    pub fn from_signal_count(bullish_signals: u8) -> Self {
        match bullish_signals {
            0 => OverallTrend::StrongBearish,
            1 => OverallTrend::Bearish,
            2 => OverallTrend::Neutral,
            3 => OverallTrend::Bullish,
            _ => OverallTrend::StrongBullish,
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, OverallTrend::Bullish | OverallTrend::StrongBullish)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Price vs EMA20
    pub short_term: TrendDirection,
    /// EMA20 vs EMA50
    pub medium_term: TrendDirection,
    /// EMA50 vs EMA200
    pub long_term: TrendDirection,
    pub bullish_signals: u8,
    /// Share of bullish checks, 0.0 - 1.0
    pub trend_strength: f64,
    pub overall_trend: OverallTrend,
    pub price_vs_ema20_pct: f64,
    pub price_vs_ema50_pct: f64,
    pub price_vs_ema200_pct: f64,
}

pub fn analyze(emas: &Emas, current_price: f64) -> TrendAnalysis {
    let Emas {
        ema20,
        ema50,
        ema200,
    } = *emas;

    let checks = [
        current_price > ema20,
        ema20 > ema50,
        ema50 > ema200,
        current_price > ema50,
        current_price > ema200,
    ];
    let bullish_signals = checks.iter().filter(|&&passed| passed).count() as u8;
    let trend_strength = f64::from(bullish_signals) / TREND_CHECKS;
    let overall_trend = OverallTrend::from_signal_count(bullish_signals);

    debug!(
        "Trend {:?}: {}/5 bullish checks (ema20={}, ema50={}, ema200={})",
        overall_trend, bullish_signals, ema20, ema50, ema200
    );

    TrendAnalysis {
        short_term: TrendDirection::from_flag(checks[0]),
        medium_term: TrendDirection::from_flag(checks[1]),
        long_term: TrendDirection::from_flag(checks[2]),
        bullish_signals,
        trend_strength: round_dp(trend_strength, 2),
        overall_trend,
        price_vs_ema20_pct: deviation_pct(current_price, ema20),
        price_vs_ema50_pct: deviation_pct(current_price, ema50),
        price_vs_ema200_pct: deviation_pct(current_price, ema200),
    }
}

/// Percentage distance of price from an EMA; a missing (zero) EMA reads as 0%
fn deviation_pct(price: f64, ema: f64) -> f64 {
    if ema == 0.0 {
        return 0.0;
    }
    round_dp((price - ema) / ema * 100.0, 2)
}
