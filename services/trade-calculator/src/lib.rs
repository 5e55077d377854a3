//! Trade Calculator Library
//!
//! Rule-based trading analysis for a single market snapshot: gap, band
//! imbalance, EMA trend, overbought alerts, directional targets and manual
//! break points, aggregated into one scored LONG/SHORT/NEUTRAL signal.

pub mod analysis;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod precision;
pub mod snapshot;
pub mod validator;

// Re-export main types for convenience
pub use calculator::{AnalysisOutcome, AnalysisResult, ErrorReport, TradingCalculator};
pub use config::CliConfig;
pub use decision::{DecisionEngine, Direction, TradingSignal};
pub use error::{AnalysisError, Result, ValidationError};
pub use snapshot::{BollingerBands, CurrentDay, Emas, MarketSnapshot, PreviousDay};
