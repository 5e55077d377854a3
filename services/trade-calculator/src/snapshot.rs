//! Market snapshot - the single point-in-time input to the engine

use serde::{Deserialize, Serialize};

/// Prior session OHLC summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousDay {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub change: f64,
}

/// Current session state at measurement time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentDay {
    pub high: f64,
    pub low: f64,
    pub current_price: f64,
    pub change: f64,
}

/// 1H Bollinger Band levels for the premarket and the prior market close.
/// Missing levels read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerBands {
    pub premarket_bbt_1h: f64,
    pub premarket_bbb_1h: f64,
    pub market_close_bbt_1h: f64,
    pub market_close_bbb_1h: f64,
}

/// 1H exponential moving averages. Missing values read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emas {
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
}

/// Complete input snapshot for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Symbol identifier (e.g., "NVDA")
    pub symbol: String,
    pub previous_day: PreviousDay,
    pub current_day: CurrentDay,
    /// Absent when the upstream pipeline has no band data
    #[serde(default)]
    pub bollinger_bands: Option<BollingerBands>,
    #[serde(default)]
    pub emas_1h: Option<Emas>,
    /// Manually entered levels, name -> price, in caller order.
    /// Non-numeric values are tolerated and ignored downstream.
    #[serde(default)]
    pub manual_break_points: serde_json::Map<String, serde_json::Value>,
}

impl MarketSnapshot {
    pub fn current_price(&self) -> f64 {
        self.current_day.current_price
    }

    /// Band levels, or the all-zero neutral default
    pub fn bands(&self) -> BollingerBands {
        self.bollinger_bands.unwrap_or_default()
    }

    /// EMA values, or the all-zero neutral default
    pub fn emas(&self) -> Emas {
        self.emas_1h.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_default() {
        let snapshot: MarketSnapshot = serde_json::from_value(serde_json::json!({
            "symbol": "NVDA",
            "previous_day": {"high": 165.0, "low": 162.0, "close": 163.87, "change": 1.2},
            "current_day": {"high": 172.81, "low": 169.91, "current_price": 171.89, "change": 8.02},
            "test_mode": true
        }))
        .unwrap();

        assert!(snapshot.bollinger_bands.is_none());
        assert_eq!(snapshot.bands(), BollingerBands::default());
        assert_eq!(snapshot.emas().ema200, 0.0);
        assert!(snapshot.manual_break_points.is_empty());
    }

    #[test]
    fn test_partial_bands_fill_zero() {
        let bands: BollingerBands = serde_json::from_value(serde_json::json!({
            "premarket_bbt_1h": 173.5
        }))
        .unwrap();
        assert_eq!(bands.premarket_bbt_1h, 173.5);
        assert_eq!(bands.market_close_bbb_1h, 0.0);
    }

    #[test]
    fn test_break_points_keep_caller_order() {
        let snapshot: MarketSnapshot = serde_json::from_value(serde_json::json!({
            "symbol": "NVDA",
            "previous_day": {"high": 1.0, "low": 1.0, "close": 1.0, "change": 0.0},
            "current_day": {"high": 1.0, "low": 1.0, "current_price": 1.0, "change": 0.0},
            "manual_break_points": {"max_pos_exp": 174.04, "break_point": 171.67, "int_neg_exp": 170.48}
        }))
        .unwrap();

        let keys: Vec<&str> = snapshot.manual_break_points.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["max_pos_exp", "break_point", "int_neg_exp"]);
    }
}
