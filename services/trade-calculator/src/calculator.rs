//! Trading calculator - the single entry point into the engine
//!
//! Runs validation, the six analysis stages and the decision engine in
//! order. A call either produces a complete `AnalysisResult` or an
//! `ErrorReport`; no stage output escapes a failed call.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::{
    alerts, break_points, gap, imbalance, targets, trend, AlertAnalysis, BreakPointAnalysis,
    DirectionalTargets, GapAnalysis, ImbalanceAnalysis, TrendAnalysis,
};
use crate::decision::{DecisionEngine, DecisionInputs, TradingSignal};
use crate::error::{AnalysisError, Result};
use crate::snapshot::MarketSnapshot;
use crate::validator;

/// Symbol reported when the input carries no usable one
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Every stage's output plus the final signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_timestamp: String,
    pub symbol: String,
    pub gap_analysis: GapAnalysis,
    pub imbalance_analysis: ImbalanceAnalysis,
    pub trend_analysis: TrendAnalysis,
    pub alerts: AlertAnalysis,
    pub directional_targets: DirectionalTargets,
    pub break_point_analysis: BreakPointAnalysis,
    pub trading_signals: TradingSignal,
}

/// Uniform failure shape returned instead of a partial result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Always true
    pub error: bool,
    pub error_message: String,
    pub analysis_timestamp: String,
    pub symbol: String,
}

/// What a caller gets back from `TradingCalculator::analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Complete(Box<AnalysisResult>),
    Failed(ErrorReport),
}

impl AnalysisOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, AnalysisOutcome::Complete(_))
    }

    pub fn symbol(&self) -> &str {
        match self {
            AnalysisOutcome::Complete(result) => &result.symbol,
            AnalysisOutcome::Failed(report) => &report.symbol,
        }
    }
}

/// Stateless calculator; every call builds fresh stage results
#[derive(Debug, Clone, Default)]
pub struct TradingCalculator {
    engine: DecisionEngine,
}

impl TradingCalculator {
    pub fn new() -> Self {
        Self {
            engine: DecisionEngine::new(),
        }
    }

    /// Analyze a raw JSON snapshot, stamping the result with the current time
    pub fn analyze(&self, raw: &Value) -> AnalysisOutcome {
        self.analyze_at(raw, Utc::now())
    }

    /// Analyze a raw JSON snapshot with an explicit timestamp
    pub fn analyze_at(&self, raw: &Value, timestamp: DateTime<Utc>) -> AnalysisOutcome {
        let outcome = validator::validate(raw)
            .and_then(|snapshot| self.analyze_snapshot_at(&snapshot, timestamp));

        match outcome {
            Ok(result) => AnalysisOutcome::Complete(Box::new(result)),
            Err(e) => {
                let symbol = raw
                    .get("symbol")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_SYMBOL)
                    .to_string();
                warn!("Analysis failed for {}: {}", symbol, e);

                AnalysisOutcome::Failed(ErrorReport {
                    error: true,
                    error_message: e.to_string(),
                    analysis_timestamp: format_timestamp(timestamp),
                    symbol,
                })
            }
        }
    }

    /// Analyze an already decoded snapshot
    pub fn analyze_snapshot(&self, snapshot: &MarketSnapshot) -> Result<AnalysisResult> {
        self.analyze_snapshot_at(snapshot, Utc::now())
    }

    pub fn analyze_snapshot_at(
        &self,
        snapshot: &MarketSnapshot,
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult> {
        validator::check_invariants(snapshot)?;

        let price = snapshot.current_price();
        let bands = snapshot.bands();
        debug!("Analyzing {} at {}", snapshot.symbol, price);

        let gap_analysis = gap::analyze(snapshot.previous_day.close, price);
        let imbalance_analysis = imbalance::analyze(&bands);
        let trend_analysis = trend::analyze(&snapshot.emas(), price);
        let alerts = alerts::analyze(&bands, price);
        let directional_targets =
            targets::analyze(price, snapshot.current_day.high, snapshot.current_day.low);
        let break_point_analysis = break_points::analyze(
            &snapshot.manual_break_points,
            price,
            &trend_analysis,
            &gap_analysis,
        );

        ensure_finite(&[
            ("gap_analysis.gap_size", gap_analysis.gap_size),
            ("gap_analysis.gap_percentage", gap_analysis.gap_percentage),
            ("imbalance_analysis.bbt_ratio", imbalance_analysis.bbt_ratio),
            ("imbalance_analysis.bbb_ratio", imbalance_analysis.bbb_ratio),
            ("trend_analysis.price_vs_ema20_pct", trend_analysis.price_vs_ema20_pct),
            ("trend_analysis.price_vs_ema50_pct", trend_analysis.price_vs_ema50_pct),
            ("trend_analysis.price_vs_ema200_pct", trend_analysis.price_vs_ema200_pct),
            ("alerts.bbt_1h", alerts.bbt_1h),
            ("alerts.bbt_30m", alerts.bbt_30m),
            ("alerts.bbt_5m", alerts.bbt_5m),
            ("alerts.bbt_1m", alerts.bbt_1m),
            ("directional_targets.distance_to_high", directional_targets.distance_to_high),
            ("directional_targets.distance_to_low", directional_targets.distance_to_low),
            ("directional_targets.position_in_range", directional_targets.position_in_range),
            ("directional_targets.probabilities.bullish", directional_targets.probabilities.bullish),
            ("directional_targets.probabilities.bearish", directional_targets.probabilities.bearish),
        ])?;
        for level in &break_point_analysis.levels {
            ensure_finite(&[
                ("break_point_analysis.distance", level.distance),
                ("break_point_analysis.hit_probability", level.hit_probability),
            ])?;
        }

        let trading_signals = self.engine.decide(&DecisionInputs {
            gap: &gap_analysis,
            imbalance: &imbalance_analysis,
            trend: &trend_analysis,
            alerts: &alerts,
            targets: &directional_targets,
            break_points: &break_point_analysis,
            current_price: price,
            day_high: snapshot.current_day.high,
            day_low: snapshot.current_day.low,
        })?;

        info!(
            "Analysis complete for {}: {} (confidence {:.2})",
            snapshot.symbol,
            trading_signals.primary_direction.as_str(),
            trading_signals.confidence
        );

        Ok(AnalysisResult {
            analysis_timestamp: format_timestamp(timestamp),
            symbol: snapshot.symbol.clone(),
            gap_analysis,
            imbalance_analysis,
            trend_analysis,
            alerts,
            directional_targets,
            break_point_analysis,
            trading_signals,
        })
    }
}

/// Reject figures that would serialize as null
fn ensure_finite(figures: &[(&str, f64)]) -> Result<()> {
    match figures.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(AnalysisError::Computation(format!(
            "Non-finite {}: {}",
            name, value
        ))),
        None => Ok(()),
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
