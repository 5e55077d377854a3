//! Decision layer
//!
//! Turns the stage results into one scored, directional trading signal.

pub mod engine;
pub mod factors;
pub mod signal;

pub use engine::{DecisionEngine, DecisionInputs};
pub use factors::{FactorScore, ScoreFactor};
pub use signal::{ConfidenceBand, Direction, SignalStrength, TradingSignal};
