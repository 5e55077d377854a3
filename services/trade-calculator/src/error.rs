//! Error types for the analysis engine

use thiserror::Error;

/// Snapshot rejected before any stage runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => field,
        }
    }
}

/// Any failure of a single analysis call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Computation failed: {0}")]
    Computation(String),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
