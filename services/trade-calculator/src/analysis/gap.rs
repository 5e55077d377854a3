//! Gap analysis - distance of the current price from the prior close

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::precision::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    Up,
    Down,
    Flat,
}

/// Gap size bucket by absolute percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClassification {
    /// Under 1%
    Small,
    /// 1% to under 3%
    Medium,
    /// 3% and above
    Large,
}

impl GapClassification {
    fn from_percentage(gap_percentage: f64) -> Self {
        let magnitude = gap_percentage.abs();
        if magnitude < 1.0 {
            GapClassification::Small
        } else if magnitude < 3.0 {
            GapClassification::Medium
        } else {
            GapClassification::Large
        }
    }

    /// Calibrated likelihood that the gap fills during the session
    pub fn fill_probability(&self) -> f64 {
        match self {
            GapClassification::Small => 0.3,
            GapClassification::Medium => 0.6,
            GapClassification::Large => 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub previous_close: f64,
    pub current_price: f64,
    pub gap_size: f64,
    pub gap_direction: GapDirection,
    pub gap_percentage: f64,
    pub fill_probability: f64,
    pub classification: GapClassification,
}

pub fn analyze(previous_close: f64, current_price: f64) -> GapAnalysis {
    let gap_size = current_price - previous_close;
    let gap_percentage = gap_size / previous_close * 100.0;

    let gap_direction = if gap_size > 0.0 {
        GapDirection::Up
    } else if gap_size < 0.0 {
        GapDirection::Down
    } else {
        GapDirection::Flat
    };

    let classification = GapClassification::from_percentage(gap_percentage);

    debug!(
        "Gap {:?}: {:.2} ({:.2}%), {:?}",
        gap_direction, gap_size, gap_percentage, classification
    );

    GapAnalysis {
        previous_close,
        current_price,
        gap_size: round_dp(gap_size, 2),
        gap_direction,
        gap_percentage: round_dp(gap_percentage, 2),
        fill_probability: classification.fill_probability(),
        classification,
    }
}
