use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// A numeric column in time order. `None` marks an undefined value.
pub type Series = Vec<Option<f64>>;

/// Lift fully defined values into a [`Series`].
pub fn series(values: &[f64]) -> Series {
    values.iter().copied().map(Some).collect()
}

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            symbol: None,
            open,
            high,
            low,
            close,
            volume,
            vwap: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Crossover direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    /// Short series moves from at-or-below to above the long series
    Golden,
    /// Short series moves from at-or-above to below the long series
    Death,
}

impl CrossDirection {
    /// Default output column name for this direction
    pub fn column_name(&self) -> &'static str {
        match self {
            CrossDirection::Golden => "golden_cross",
            CrossDirection::Death => "death_cross",
        }
    }
}

impl fmt::Display for CrossDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossDirection::Golden => write!(f, "golden"),
            CrossDirection::Death => write!(f, "death"),
        }
    }
}

impl FromStr for CrossDirection {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "golden" => Ok(CrossDirection::Golden),
            "death" => Ok(CrossDirection::Death),
            other => Err(IndicatorError::InvalidParameter(format!(
                "unknown cross direction '{}', expected 'golden' or 'death'",
                other
            ))),
        }
    }
}

/// Period-over-period return flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    #[default]
    Simple,
    Log,
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Simple => write!(f, "simple"),
            ReturnType::Log => write!(f, "log"),
        }
    }
}

impl FromStr for ReturnType {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "arithmetic" => Ok(ReturnType::Simple),
            "log" => Ok(ReturnType::Log),
            other => Err(IndicatorError::InvalidParameter(format!(
                "unknown return type '{}', expected 'simple' or 'log'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_lifts_values() {
        assert_eq!(series(&[1.0, 2.0]), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_cross_direction_parse() {
        assert_eq!("golden".parse::<CrossDirection>().unwrap(), CrossDirection::Golden);
        assert_eq!(" Death ".parse::<CrossDirection>().unwrap(), CrossDirection::Death);
        assert!("sideways".parse::<CrossDirection>().is_err());
    }

    #[test]
    fn test_return_type_parse() {
        assert_eq!("arithmetic".parse::<ReturnType>().unwrap(), ReturnType::Simple);
        assert_eq!("LOG".parse::<ReturnType>().unwrap(), ReturnType::Log);

        let err = "geometric".parse::<ReturnType>().unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(_)));
    }

    #[test]
    fn test_bar_json_without_optional_fields() {
        let json = r#"{"timestamp":"2024-01-02T00:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":100.0}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert!(bar.symbol.is_none());
        assert!(bar.vwap.is_none());
    }
}
