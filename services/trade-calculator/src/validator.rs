//! Input validation - gates every analysis stage
//!
//! Presence is checked on the raw JSON first, in a fixed order, so the
//! reported field is always the first one missing. Typed decoding and the
//! price invariants follow.

use serde_json::Value;

use crate::error::{AnalysisError, Result, ValidationError};
use crate::snapshot::MarketSnapshot;

const TOP_LEVEL_FIELDS: [&str; 3] = ["symbol", "previous_day", "current_day"];
const PREVIOUS_DAY_FIELDS: [&str; 4] = ["high", "low", "close", "change"];
const CURRENT_DAY_FIELDS: [&str; 4] = ["high", "low", "current_price", "change"];

/// Validate a raw snapshot and decode it
pub fn validate(raw: &Value) -> Result<MarketSnapshot> {
    check_presence(raw)?;

    let snapshot: MarketSnapshot = serde_json::from_value(raw.clone())
        .map_err(|e| AnalysisError::Computation(format!("Malformed market data: {}", e)))?;

    check_invariants(&snapshot)?;
    Ok(snapshot)
}

/// Confirm every required field is present and non-null
pub fn check_presence(raw: &Value) -> std::result::Result<(), ValidationError> {
    for field in TOP_LEVEL_FIELDS {
        if is_missing(raw.get(field)) {
            return Err(ValidationError::missing(field));
        }
    }

    for (section, fields) in [
        ("previous_day", &PREVIOUS_DAY_FIELDS),
        ("current_day", &CURRENT_DAY_FIELDS),
    ] {
        let section_value = &raw[section];
        for field in fields.iter() {
            if is_missing(section_value.get(*field)) {
                return Err(ValidationError::missing(format!("{}.{}", section, field)));
            }
        }
    }

    Ok(())
}

/// Price fields must be positive and finite; the day's range must not be inverted
pub fn check_invariants(snapshot: &MarketSnapshot) -> std::result::Result<(), ValidationError> {
    let prev = &snapshot.previous_day;
    let cur = &snapshot.current_day;

    let prices = [
        ("previous_day.high", prev.high),
        ("previous_day.low", prev.low),
        ("previous_day.close", prev.close),
        ("current_day.high", cur.high),
        ("current_day.low", cur.low),
        ("current_day.current_price", cur.current_price),
    ];

    for (field, value) in prices {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::invalid(
                field,
                format!("expected a positive price, got {}", value),
            ));
        }
    }

    for (field, value) in [("previous_day.change", prev.change), ("current_day.change", cur.change)] {
        if !value.is_finite() {
            return Err(ValidationError::invalid(field, "expected a finite number"));
        }
    }

    if cur.high < cur.low {
        return Err(ValidationError::invalid(
            "current_day.high",
            format!("day high {} is below day low {}", cur.high, cur.low),
        ));
    }

    Ok(())
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}
