//! Break point analysis over manually supplied support/resistance levels
//!
//! Level names are free-form (break_point, max_pos_exp, int_neg_exp, ...).
//! Entries that are not finite numbers are skipped. With no usable level the
//! stage reports `levels_provided = false`, which is a normal outcome.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::gap::GapAnalysis;
use super::trend::TrendAnalysis;
use crate::precision::round_dp;

/// Which side of a level the current price sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSide {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakLevel {
    pub name: String,
    pub value: f64,
    pub distance: f64,
    pub direction: LevelSide,
    /// Linear decay with relative distance, clamped to 0.0 - 1.0
    pub hit_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakPointAnalysis {
    pub levels_provided: bool,
    pub levels: Vec<BreakLevel>,
    pub nearest_level: Option<String>,
    pub nearest_value: Option<f64>,
    pub nearest_distance: Option<f64>,
    /// Lowest level above the current price
    pub nearest_resistance: Option<f64>,
    /// Highest level below the current price
    pub nearest_support: Option<f64>,
    /// Momentum-based chance of breaking upward, 0.1 - 0.9
    pub probability_break_up: Option<f64>,
}

impl BreakPointAnalysis {
    fn not_provided() -> Self {
        Self {
            levels_provided: false,
            levels: Vec::new(),
            nearest_level: None,
            nearest_value: None,
            nearest_distance: None,
            nearest_resistance: None,
            nearest_support: None,
            probability_break_up: None,
        }
    }
}

pub fn analyze(
    manual_levels: &Map<String, Value>,
    current_price: f64,
    trend: &TrendAnalysis,
    gap: &GapAnalysis,
) -> BreakPointAnalysis {
    let numeric: Vec<(&String, f64)> = manual_levels
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_f64()
                .filter(|v| v.is_finite())
                .map(|v| (name, v))
        })
        .collect();

    if numeric.is_empty() {
        debug!("Break points: no numeric levels supplied");
        return BreakPointAnalysis::not_provided();
    }

    let mut levels = Vec::with_capacity(numeric.len());
    let mut nearest: Option<(&String, f64, f64)> = None;

    for &(name, value) in &numeric {
        let distance = (current_price - value).abs();
        let direction = if current_price > value {
            LevelSide::Above
        } else {
            LevelSide::Below
        };
        let hit_probability = (1.0 - distance / current_price).clamp(0.0, 1.0);

        // Strict comparison keeps the first of equally distant levels
        if nearest.map_or(true, |(_, _, best)| distance < best) {
            nearest = Some((name, value, distance));
        }

        levels.push(BreakLevel {
            name: name.clone(),
            value,
            distance: round_dp(distance, 2),
            direction,
            hit_probability: round_dp(hit_probability, 3),
        });
    }

    let nearest_resistance = numeric
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| *v > current_price)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
    let nearest_support = numeric
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| *v < current_price)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

    let gap_momentum = gap.gap_percentage.abs() / 10.0;
    let probability_break_up = (trend.trend_strength * 0.7 + gap_momentum * 0.3).clamp(0.1, 0.9);

    debug!(
        "Break points: {} levels, nearest {:?}, break-up probability {:.2}",
        levels.len(),
        nearest.map(|(name, _, _)| name),
        probability_break_up
    );

    BreakPointAnalysis {
        levels_provided: true,
        levels,
        nearest_level: nearest.map(|(name, _, _)| name.clone()),
        nearest_value: nearest.map(|(_, value, _)| value),
        nearest_distance: nearest.map(|(_, _, distance)| round_dp(distance, 2)),
        nearest_resistance,
        nearest_support,
        probability_break_up: Some(round_dp(probability_break_up, 2)),
    }
}
