//! Decision engine - aggregates stage scores into one trading signal

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::factors::{FactorScore, ScoreFactor};
use super::signal::{recommendation, Direction, TradingSignal};
use crate::analysis::{
    AlertAnalysis, BreakPointAnalysis, DirectionalTargets, GapAnalysis, ImbalanceAnalysis,
    TrendAnalysis,
};
use crate::error::{AnalysisError, Result};
use crate::precision::{price_dp, round_dp, to_price};

/// Total score that maps to full confidence
const FULL_CONFIDENCE_SCORE: f64 = 3.0;
/// Entry offsets from current price, nearest first
const ENTRY_OFFSETS: [f64; 2] = [0.001, 0.003];
const STOP_VOLATILITY_MULTIPLIER: f64 = 1.5;
const TARGET_VOLATILITY_MULTIPLIERS: [f64; 2] = [1.0, 2.0];

/// Everything the engine reads: upstream results plus the day's prices
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    pub gap: &'a GapAnalysis,
    pub imbalance: &'a ImbalanceAnalysis,
    pub trend: &'a TrendAnalysis,
    pub alerts: &'a AlertAnalysis,
    pub targets: &'a DirectionalTargets,
    /// Reported alongside the signal; carries no score weight
    pub break_points: &'a BreakPointAnalysis,
    pub current_price: f64,
    pub day_high: f64,
    pub day_low: f64,
}

/// Stateless scorer; one instance can serve any number of snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generate trading signal
    pub fn decide(&self, inputs: &DecisionInputs<'_>) -> Result<TradingSignal> {
        let factors: [&dyn ScoreFactor; 5] = [
            inputs.gap,
            inputs.imbalance,
            inputs.trend,
            inputs.alerts,
            inputs.targets,
        ];

        let score_breakdown: Vec<FactorScore> = factors
            .iter()
            .map(|f| FactorScore::from_factor(*f))
            .collect();
        let total_score: f64 = score_breakdown.iter().map(|f| f.score).sum();

        if !total_score.is_finite() {
            return Err(AnalysisError::Computation(format!(
                "Non-finite total score: {:?}",
                score_breakdown
            )));
        }

        let confidence = (total_score.abs() / FULL_CONFIDENCE_SCORE).min(1.0);
        let direction = Direction::from_score(total_score);

        let price = inputs.current_price;
        let volatility = (inputs.day_high - inputs.day_low) / price;
        if !volatility.is_finite() {
            return Err(AnalysisError::Computation(format!(
                "Non-finite volatility for range {} - {} at price {}",
                inputs.day_low, inputs.day_high, price
            )));
        }

        debug!(
            "Decision: total score {:.3} -> {:?}, volatility {:.4}, nearest level {:?}",
            total_score, direction, volatility, inputs.break_points.nearest_level
        );

        let dp = price_dp(price);
        let levels = TradeLevels::for_direction(direction, price, volatility, dp)?;
        let risk_reward = levels.risk_reward(level(price, dp)?)?;

        Ok(TradingSignal {
            primary_direction: direction,
            confidence: round_dp(confidence, 2),
            total_score: round_dp(total_score, 3),
            score_breakdown: score_breakdown
                .into_iter()
                .map(|f| FactorScore {
                    score: round_dp(f.score, 3),
                    ..f
                })
                .collect(),
            volatility: round_dp(volatility, 4),
            entry_levels: levels.entry.to_vec(),
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit.to_vec(),
            risk_reward,
            recommendation: recommendation(direction, confidence, total_score),
        })
    }
}

/// Entry, stop and targets at the price's precision
struct TradeLevels {
    direction: Direction,
    entry: [Decimal; 2],
    stop_loss: Decimal,
    take_profit: [Decimal; 2],
}

impl TradeLevels {
    fn for_direction(direction: Direction, price: f64, volatility: f64, dp: u32) -> Result<Self> {
        // Longs buy below and target above; shorts mirror that
        let sign = match direction {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
            Direction::Neutral => {
                let at_price = level(price, dp)?;
                return Ok(Self {
                    direction,
                    entry: [at_price; 2],
                    stop_loss: at_price,
                    take_profit: [at_price; 2],
                });
            }
        };

        let [near, far] = ENTRY_OFFSETS;
        let [first, second] = TARGET_VOLATILITY_MULTIPLIERS;

        Ok(Self {
            direction,
            entry: [
                level(price * (1.0 - sign * near), dp)?,
                level(price * (1.0 - sign * far), dp)?,
            ],
            stop_loss: level(
                price * (1.0 - sign * volatility * STOP_VOLATILITY_MULTIPLIER),
                dp,
            )?,
            take_profit: [
                level(price * (1.0 + sign * volatility * first), dp)?,
                level(price * (1.0 + sign * volatility * second), dp)?,
            ],
        })
    }

    fn risk_reward(&self, price: Decimal) -> Result<f64> {
        if self.direction == Direction::Neutral {
            return Ok(0.0);
        }

        let risk = (price - self.stop_loss).abs();
        if risk.is_zero() {
            return Ok(0.0);
        }

        let reward = (self.take_profit[0] - price).abs();
        let ratio = reward.checked_div(risk).ok_or_else(|| {
            AnalysisError::Computation(format!("Risk/reward overflow: {} / {}", reward, risk))
        })?;
        Ok(ratio
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(0.0))
    }
}

fn level(value: f64, dp: u32) -> Result<Decimal> {
    to_price(value, dp).ok_or_else(|| {
        AnalysisError::Computation(format!("Price level {} is out of decimal range", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{alerts, break_points, gap, imbalance, targets, trend};
    use crate::snapshot::{BollingerBands, Emas};
    use std::str::FromStr;

    struct Stages {
        gap: GapAnalysis,
        imbalance: ImbalanceAnalysis,
        trend: TrendAnalysis,
        alerts: AlertAnalysis,
        targets: DirectionalTargets,
        break_points: BreakPointAnalysis,
    }

    fn run(
        previous_close: f64,
        price: f64,
        high: f64,
        low: f64,
        bands: BollingerBands,
        emas: Emas,
    ) -> TradingSignal {
        try_run(previous_close, price, high, low, bands, emas).unwrap()
    }

    fn try_run(
        previous_close: f64,
        price: f64,
        high: f64,
        low: f64,
        bands: BollingerBands,
        emas: Emas,
    ) -> Result<TradingSignal> {
        let gap = gap::analyze(previous_close, price);
        let trend = trend::analyze(&emas, price);
        let stages = Stages {
            imbalance: imbalance::analyze(&bands),
            alerts: alerts::analyze(&bands, price),
            targets: targets::analyze(price, high, low),
            break_points: break_points::analyze(&serde_json::Map::new(), price, &trend, &gap),
            gap,
            trend,
        };

        DecisionEngine::new()
            .decide(&DecisionInputs {
                gap: &stages.gap,
                imbalance: &stages.imbalance,
                trend: &stages.trend,
                alerts: &stages.alerts,
                targets: &stages.targets,
                break_points: &stages.break_points,
                current_price: price,
                day_high: high,
                day_low: low,
            })
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn quiet_bands() -> BollingerBands {
        // Top band far above price: no overbought flags, neutral imbalance
        BollingerBands {
            premarket_bbt_1h: 120.0,
            premarket_bbb_1h: 90.0,
            market_close_bbt_1h: 120.0,
            market_close_bbb_1h: 90.0,
        }
    }

    fn expanding_bands() -> BollingerBands {
        // Top band up 5.8%, bottom band down 5.6%: strong bullish imbalance
        BollingerBands {
            premarket_bbt_1h: 127.0,
            premarket_bbb_1h: 85.0,
            market_close_bbt_1h: 120.0,
            market_close_bbb_1h: 90.0,
        }
    }

    #[test]
    fn test_long_signal_levels() {
        // Medium gap up (+0.3), strong bullish imbalance (+0.8), full trend (+1.0),
        // no alerts, bearish prediction near the low (+0.3)
        let signal = run(
            98.0,
            100.0,
            104.0,
            99.0,
            expanding_bands(),
            Emas { ema20: 99.0, ema50: 97.0, ema200: 90.0 },
        );

        assert_eq!(signal.primary_direction, Direction::Long);
        assert_eq!(signal.total_score, 2.4);
        assert_eq!(signal.confidence, 0.8);
        assert_eq!(signal.volatility, 0.05);
        assert_eq!(signal.entry_levels, vec![dec("99.90"), dec("99.70")]);
        assert_eq!(signal.stop_loss, dec("92.50"));
        assert_eq!(signal.take_profit, vec![dec("105.00"), dec("110.00")]);
        assert_eq!(signal.risk_reward, 0.67);
        assert_eq!(signal.recommendation, "Strong LONG signal with High confidence");
    }

    #[test]
    fn test_short_signal_mirrors_levels() {
        // Medium gap down (-0.3), bearish trend (-1.0), bullish prediction near
        // the high (0.2 - 0.5 = -0.3)
        let signal = run(
            102.0,
            100.0,
            101.0,
            96.0,
            quiet_bands(),
            Emas { ema20: 101.0, ema50: 103.0, ema200: 110.0 },
        );

        assert_eq!(signal.primary_direction, Direction::Short);
        assert_eq!(signal.total_score, -1.6);
        assert_eq!(signal.entry_levels, vec![dec("100.10"), dec("100.30")]);
        assert_eq!(signal.stop_loss, dec("107.50"));
        assert_eq!(signal.take_profit, vec![dec("95.00"), dec("90.00")]);
        assert_eq!(signal.risk_reward, 0.67);
        assert!(signal.stop_loss > dec("100"));
    }

    #[test]
    fn test_neutral_collapses_levels() {
        // Small gap down (-0.3), neutral bands, trend 3/5 (+0.6), midpoint tie (0.0)
        let signal = run(
            100.5,
            100.0,
            102.0,
            98.0,
            quiet_bands(),
            Emas { ema20: 99.0, ema50: 100.5, ema200: 95.0 },
        );

        assert_eq!(signal.primary_direction, Direction::Neutral);
        assert_eq!(signal.risk_reward, 0.0);
        assert_eq!(signal.entry_levels, vec![dec("100"), dec("100")]);
        assert_eq!(signal.stop_loss, dec("100"));
        assert_eq!(signal.take_profit, vec![dec("100"), dec("100")]);
    }

    #[test]
    fn test_zero_range_has_no_risk() {
        let signal = run(
            98.0,
            100.0,
            100.0,
            100.0,
            expanding_bands(),
            Emas { ema20: 99.0, ema50: 97.0, ema200: 90.0 },
        );

        assert_eq!(signal.primary_direction, Direction::Long);
        assert_eq!(signal.volatility, 0.0);
        assert_eq!(signal.stop_loss, dec("100"));
        assert_eq!(signal.risk_reward, 0.0);
    }

    #[test]
    fn test_breakdown_lists_all_factors() {
        let signal = run(
            100.0,
            100.0,
            102.0,
            98.0,
            quiet_bands(),
            Emas::default(),
        );
        let names: Vec<&str> = signal.score_breakdown.iter().map(|f| f.factor.as_str()).collect();
        assert_eq!(names, vec!["gap", "imbalance", "trend", "alerts", "directional"]);
        assert!((0.0..=1.0).contains(&signal.confidence));
    }

    #[test]
    fn test_sub_cent_price_keeps_significant_digits() {
        let signal = run(
            0.000995,
            0.00101,
            0.00104,
            0.00099,
            BollingerBands {
                premarket_bbt_1h: 0.00127,
                premarket_bbb_1h: 0.00085,
                market_close_bbt_1h: 0.0012,
                market_close_bbb_1h: 0.0009,
            },
            Emas { ema20: 0.00099, ema50: 0.00097, ema200: 0.0009 },
        );

        assert_eq!(signal.primary_direction, Direction::Long);
        assert_eq!(signal.total_score, 2.2);
        assert_eq!(signal.entry_levels, vec![dec("0.001009"), dec("0.001007")]);
        assert_eq!(signal.stop_loss, dec("0.000935"));
        assert_eq!(signal.take_profit, vec![dec("0.00106"), dec("0.00111")]);
        assert_eq!(signal.risk_reward, 0.67);
    }

    #[test]
    fn test_price_beyond_decimal_range_is_an_error() {
        let price = 1e30;
        let result = try_run(
            price * 0.98,
            price,
            price * 1.04,
            price * 0.99,
            expanding_bands(),
            Emas { ema20: price * 0.99, ema50: price * 0.97, ema200: price * 0.9 },
        );

        assert!(matches!(result, Err(AnalysisError::Computation(_))));
    }

    #[test]
    fn test_non_finite_volatility_is_an_error() {
        let result = try_run(
            1e-300,
            1e-300,
            1e300,
            1e-300,
            quiet_bands(),
            Emas::default(),
        );

        assert!(matches!(result, Err(AnalysisError::Computation(_))));
    }
}
