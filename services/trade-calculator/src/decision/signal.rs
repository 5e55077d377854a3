//! Trading signal - output of the decision engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::factors::FactorScore;

/// Directional call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl Direction {
    pub fn from_score(total_score: f64) -> Self {
        if total_score > 0.5 {
            Direction::Long
        } else if total_score < -0.5 {
            Direction::Short
        } else {
            Direction::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Neutral => "NEUTRAL",
        }
    }
}

/// Confidence bucket used in the recommendation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            ConfidenceBand::High
        } else if confidence > 0.4 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Score magnitude bucket used in the recommendation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStrength {
    Strong,
    Moderate,
    Weak,
}

impl SignalStrength {
    pub fn from_score(total_score: f64) -> Self {
        let magnitude = total_score.abs();
        if magnitude > 1.5 {
            SignalStrength::Strong
        } else if magnitude > 0.8 {
            SignalStrength::Moderate
        } else {
            SignalStrength::Weak
        }
    }
}

pub const NEUTRAL_RECOMMENDATION: &str =
    "NEUTRAL - no clear edge, wait and see before entering a position";

/// Human-readable recommendation
pub fn recommendation(direction: Direction, confidence: f64, total_score: f64) -> String {
    if direction == Direction::Neutral {
        return NEUTRAL_RECOMMENDATION.to_string();
    }

    format!(
        "{:?} {} signal with {:?} confidence",
        SignalStrength::from_score(total_score),
        direction.as_str(),
        ConfidenceBand::from_confidence(confidence)
    )
}

/// Final trading signal with entry/exit levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub primary_direction: Direction,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub total_score: f64,
    pub score_breakdown: Vec<FactorScore>,
    /// Day range relative to current price
    pub volatility: f64,
    pub entry_levels: Vec<Decimal>,
    pub stop_loss: Decimal,
    pub take_profit: Vec<Decimal>,
    /// Reward to first target over risk to stop; 0 when neutral
    pub risk_reward: f64,
    pub recommendation: String,
}
