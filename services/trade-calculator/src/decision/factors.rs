//! Score factors - each upstream stage's vote in the final decision
//!
//! Scores fall roughly in -1.0 (bearish) to 1.0 (bullish).

use serde::{Deserialize, Serialize};

use crate::analysis::{
    AlertAnalysis, DirectionalTargets, GapAnalysis, GapClassification, GapDirection,
    ImbalanceAnalysis, ImbalanceDirection, TargetPrediction, TrendAnalysis,
};

/// A stage result that contributes to the total score
pub trait ScoreFactor {
    fn name(&self) -> &'static str;
    fn score(&self) -> f64;
}

/// One factor's contribution, as reported in the signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: String,
    pub score: f64,
}

impl FactorScore {
    pub fn from_factor(factor: &dyn ScoreFactor) -> Self {
        Self {
            factor: factor.name().to_string(),
            score: factor.score(),
        }
    }
}

impl ScoreFactor for GapAnalysis {
    fn name(&self) -> &'static str {
        "gap"
    }

    /// Large gaps are expected to fill, so they vote against their direction
    fn score(&self) -> f64 {
        match (self.classification, self.gap_direction) {
            (_, GapDirection::Flat) => 0.0,
            (GapClassification::Large, GapDirection::Up) => -0.8,
            (GapClassification::Large, GapDirection::Down) => 0.8,
            (_, GapDirection::Up) => 0.3,
            (_, GapDirection::Down) => -0.3,
        }
    }
}

impl ScoreFactor for ImbalanceAnalysis {
    fn name(&self) -> &'static str {
        "imbalance"
    }

    fn score(&self) -> f64 {
        match self.imbalance_direction {
            ImbalanceDirection::StrongBullish => 0.8,
            ImbalanceDirection::Bullish => 0.5,
            ImbalanceDirection::Neutral => 0.0,
            ImbalanceDirection::Bearish => -0.5,
            ImbalanceDirection::StrongBearish => -0.8,
        }
    }
}

impl ScoreFactor for TrendAnalysis {
    fn name(&self) -> &'static str {
        "trend"
    }

    /// Non-bullish trends are shifted into negative territory
    fn score(&self) -> f64 {
        if self.overall_trend.is_bullish() {
            self.trend_strength
        } else {
            self.trend_strength - 1.0
        }
    }
}

impl ScoreFactor for AlertAnalysis {
    fn name(&self) -> &'static str {
        "alerts"
    }

    fn score(&self) -> f64 {
        -0.2 * self.overbought_count() as f64
    }
}

impl ScoreFactor for DirectionalTargets {
    fn name(&self) -> &'static str {
        "directional"
    }

    fn score(&self) -> f64 {
        match self.first_target_prediction {
            TargetPrediction::Bullish => self.probabilities.bullish - 0.5,
            TargetPrediction::Bearish => -(self.probabilities.bearish - 0.5),
        }
    }
}
