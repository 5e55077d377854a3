//! Analysis stages
//!
//! Each stage is a pure function over snapshot fields (and, for break points,
//! upstream stage results) returning a fresh read-only result.

pub mod alerts;
pub mod break_points;
pub mod gap;
pub mod imbalance;
pub mod targets;
pub mod trend;

pub use alerts::{AlertAnalysis, CorrectionLevel};
pub use break_points::{BreakLevel, BreakPointAnalysis, LevelSide};
pub use gap::{GapAnalysis, GapClassification, GapDirection};
pub use imbalance::{ImbalanceAnalysis, ImbalanceDirection, ImbalanceStrength};
pub use targets::{DirectionalTargets, TargetPrediction, TargetProbabilities};
pub use trend::{OverallTrend, TrendAnalysis, TrendDirection};
