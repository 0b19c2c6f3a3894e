use serde::{Deserialize, Serialize};

use crate::error::{check_period, IndicatorError, Result};
use crate::types::ReturnType;

/// Indicator set parameters
///
/// Every field has a conventional default, so a JSON file only needs the
/// values it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParameters {
    // Input
    /// Price column single-series indicators read from
    pub source: String,
    /// Text column to partition rows by (e.g. "symbol")
    pub group_by: Option<String>,
    // Moving averages
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    // Momentum
    pub rsi_enabled: bool,
    pub rsi_period: usize,
    pub macd_enabled: bool,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_enabled: bool,
    pub stoch_period: usize,
    pub stoch_smooth: usize,
    pub cci_enabled: bool,
    pub cci_period: usize,
    pub williams_r_enabled: bool,
    pub williams_r_period: usize,
    pub momentum_enabled: bool,
    pub momentum_period: usize,
    pub returns_enabled: bool,
    pub return_type: ReturnType,
    // Volatility
    pub bb_enabled: bool,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub atr_enabled: bool,
    pub atr_period: usize,
    // Volume
    pub obv_enabled: bool,
    pub vwap_enabled: bool,
    // Trend signals (SMA fast/slow crossover)
    pub cross_enabled: bool,
    pub cross_fast_period: usize,
    pub cross_slow_period: usize,
}

impl Default for IndicatorParameters {
    fn default() -> Self {
        Self {
            source: "close".to_string(),
            group_by: None,
            sma_periods: vec![20],
            ema_periods: vec![20],
            rsi_enabled: true,
            rsi_period: 14,
            macd_enabled: true,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_enabled: true,
            stoch_period: 14,
            stoch_smooth: 3,
            cci_enabled: true,
            cci_period: 20,
            williams_r_enabled: true,
            williams_r_period: 14,
            momentum_enabled: true,
            momentum_period: 10,
            returns_enabled: true,
            return_type: ReturnType::Simple,
            bb_enabled: true,
            bb_period: 20,
            bb_std_dev: 2.0,
            atr_enabled: true,
            atr_period: 14,
            obv_enabled: true,
            vwap_enabled: true,
            cross_enabled: true,
            cross_fast_period: 20,
            cross_slow_period: 50,
        }
    }
}

impl IndicatorParameters {
    /// Parse parameters from a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Preset with every indicator switched off; enable what you need
    pub fn none() -> Self {
        Self {
            sma_periods: Vec::new(),
            ema_periods: Vec::new(),
            rsi_enabled: false,
            macd_enabled: false,
            stoch_enabled: false,
            cci_enabled: false,
            williams_r_enabled: false,
            momentum_enabled: false,
            returns_enabled: false,
            bb_enabled: false,
            atr_enabled: false,
            obv_enabled: false,
            vwap_enabled: false,
            cross_enabled: false,
            ..Default::default()
        }
    }

    /// Check every period and multiplier before any computation starts
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(IndicatorError::InvalidParameter(
                "source column name must not be empty".to_string(),
            ));
        }
        for &p in &self.sma_periods {
            check_period("sma period", p)?;
        }
        for &p in &self.ema_periods {
            check_period("ema period", p)?;
        }
        check_period("rsi_period", self.rsi_period)?;
        check_period("macd_fast", self.macd_fast)?;
        check_period("macd_slow", self.macd_slow)?;
        check_period("macd_signal", self.macd_signal)?;
        check_period("stoch_period", self.stoch_period)?;
        check_period("stoch_smooth", self.stoch_smooth)?;
        check_period("cci_period", self.cci_period)?;
        check_period("williams_r_period", self.williams_r_period)?;
        check_period("momentum_period", self.momentum_period)?;
        check_period("bb_period", self.bb_period)?;
        check_period("atr_period", self.atr_period)?;
        check_period("cross_fast_period", self.cross_fast_period)?;
        check_period("cross_slow_period", self.cross_slow_period)?;
        if !self.bb_std_dev.is_finite() || self.bb_std_dev < 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "bb_std_dev must be a non-negative number, got {}",
                self.bb_std_dev
            )));
        }
        Ok(())
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    pub fn with_sma_periods(mut self, periods: &[usize]) -> Self {
        self.sma_periods = periods.to_vec();
        self
    }

    pub fn with_ema_periods(mut self, periods: &[usize]) -> Self {
        self.ema_periods = periods.to_vec();
        self
    }

    pub fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_enabled = true;
        self.rsi_period = period;
        self
    }

    pub fn with_macd(mut self, fast: usize, slow: usize, signal: usize) -> Self {
        self.macd_enabled = true;
        self.macd_fast = fast;
        self.macd_slow = slow;
        self.macd_signal = signal;
        self
    }

    pub fn with_bollinger(mut self, period: usize, std_dev: f64) -> Self {
        self.bb_enabled = true;
        self.bb_period = period;
        self.bb_std_dev = std_dev;
        self
    }

    pub fn with_cross_periods(mut self, fast: usize, slow: usize) -> Self {
        self.cross_enabled = true;
        self.cross_fast_period = fast;
        self.cross_slow_period = slow;
        self
    }

    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.returns_enabled = true;
        self.return_type = return_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(IndicatorParameters::default().validate().is_ok());
        assert!(IndicatorParameters::none().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params =
            IndicatorParameters::from_json(r#"{"rsi_period": 7, "return_type": "log"}"#).unwrap();
        assert_eq!(params.rsi_period, 7);
        assert_eq!(params.return_type, ReturnType::Log);
        assert_eq!(params.macd_slow, 26);
        assert_eq!(params.source, "close");
    }

    #[test]
    fn test_zero_period_rejected() {
        let err = IndicatorParameters::default()
            .with_macd(12, 0, 9)
            .validate()
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(_)));
        assert!(err.to_string().contains("macd_slow"));
    }

    #[test]
    fn test_negative_band_width_rejected() {
        let params = IndicatorParameters::default().with_bollinger(20, -1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_unknown_return_type_in_json() {
        let err = IndicatorParameters::from_json(r#"{"return_type": "geometric"}"#).unwrap_err();
        assert!(matches!(err, IndicatorError::JsonError(_)));
    }
}
