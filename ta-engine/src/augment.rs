//! Table-level indicator entry points.
//!
//! Every `add_*` function validates its parameters and required columns before
//! touching any data, computes per group through [`apply_grouped`], and returns
//! a new [`Table`] holding the original columns plus the indicator output.

use common::{check_period, CrossDirection, IndicatorError, Result, ReturnType};
use tracing::debug;

use crate::frame::{Column, Table, CLOSE, HIGH, LOW, VOLUME};
use crate::indicators::{
    calculate_atr, calculate_bollinger_bands, calculate_cci, calculate_ema, calculate_macd,
    calculate_momentum, calculate_obv, calculate_returns, calculate_rsi, calculate_sma,
    calculate_stochastic, calculate_vwap, calculate_williams_r,
};
use crate::partition::{apply_grouped, validate_group_by, GroupBy};
use crate::signals::detect_cross;

/// Source column, output name and grouping for an `add_*` call
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub source: Option<String>,
    pub output: Option<String>,
    pub group_by: GroupBy,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price column to read (default `close`)
    pub fn source(mut self, column: impl Into<String>) -> Self {
        self.source = Some(column.into());
        self
    }

    /// Output column name for single-output indicators
    pub fn output(mut self, column: impl Into<String>) -> Self {
        self.output = Some(column.into());
        self
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    fn source_or_close(&self) -> &str {
        self.source.as_deref().unwrap_or(CLOSE)
    }

    fn output_or(&self, default: String) -> String {
        self.output.clone().unwrap_or(default)
    }
}

/// Eager schema check: every required column must exist and be numeric, and
/// the grouping key must be a text column.
fn validate(table: &Table, required: &[&str], opts: &AddOptions) -> Result<()> {
    let mut names: Vec<&str> = required.to_vec();
    if let Some(key) = opts.group_by.key_column() {
        names.push(key);
    }
    table.require(&names)?;
    for name in required {
        table.numeric(name)?;
    }
    validate_group_by(table, &opts.group_by)
}

fn single(name: &str, series: common::Series) -> Vec<(String, Column)> {
    vec![(name.to_string(), Column::Numeric(series))]
}

pub fn add_sma(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    let output = opts.output_or(format!("sma_{}", period));
    debug!(indicator = "sma", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_sma(t.numeric(source)?, period)?))
    })
}

pub fn add_ema(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    let output = opts.output_or(format!("ema_{}", period));
    debug!(indicator = "ema", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_ema(t.numeric(source)?, period)?))
    })
}

pub fn add_rsi(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    let output = opts.output_or(format!("rsi_{}", period));
    debug!(indicator = "rsi", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_rsi(t.numeric(source)?, period)?))
    })
}

pub fn add_momentum(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    let output = opts.output_or(format!("momentum_{}", period));
    debug!(indicator = "momentum", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_momentum(t.numeric(source)?, period)?))
    })
}

pub fn add_returns(table: &Table, return_type: ReturnType, opts: &AddOptions) -> Result<Table> {
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    let output = opts.output_or("returns".to_string());
    debug!(indicator = "returns", %return_type, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_returns(t.numeric(source)?, return_type)))
    })
}

/// Adds `macd`, `macd_signal` and `macd_histogram`
pub fn add_macd(
    table: &Table,
    fast: usize,
    slow: usize,
    signal: usize,
    opts: &AddOptions,
) -> Result<Table> {
    check_period("fast", fast)?;
    check_period("slow", slow)?;
    check_period("signal", signal)?;
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    debug!(indicator = "macd", fast, slow, signal, "adding columns");

    apply_grouped(table, &opts.group_by, |t| {
        let m = calculate_macd(t.numeric(source)?, fast, slow, signal)?;
        Ok(vec![
            ("macd".to_string(), Column::Numeric(m.macd)),
            ("macd_signal".to_string(), Column::Numeric(m.signal)),
            ("macd_histogram".to_string(), Column::Numeric(m.histogram)),
        ])
    })
}

/// Adds `bb_upper`, `bb_middle` and `bb_lower`
pub fn add_bollinger(table: &Table, period: usize, std_dev: f64, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "band multiplier must be a non-negative number, got {}",
            std_dev
        )));
    }
    let source = opts.source_or_close();
    validate(table, &[source], opts)?;
    debug!(indicator = "bollinger", period, std_dev, "adding columns");

    apply_grouped(table, &opts.group_by, |t| {
        let bb = calculate_bollinger_bands(t.numeric(source)?, period, std_dev)?;
        Ok(vec![
            ("bb_upper".to_string(), Column::Numeric(bb.upper)),
            ("bb_middle".to_string(), Column::Numeric(bb.middle)),
            ("bb_lower".to_string(), Column::Numeric(bb.lower)),
        ])
    })
}

/// Adds `stoch_k` and `stoch_d`
pub fn add_stochastic(table: &Table, period: usize, smooth: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    check_period("smooth", smooth)?;
    validate(table, &[HIGH, LOW, CLOSE], opts)?;
    debug!(indicator = "stochastic", period, smooth, "adding columns");

    apply_grouped(table, &opts.group_by, |t| {
        let s = calculate_stochastic(t.numeric(HIGH)?, t.numeric(LOW)?, t.numeric(CLOSE)?, period, smooth)?;
        Ok(vec![
            ("stoch_k".to_string(), Column::Numeric(s.k)),
            ("stoch_d".to_string(), Column::Numeric(s.d)),
        ])
    })
}

pub fn add_cci(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    validate(table, &[HIGH, LOW, CLOSE], opts)?;
    let output = opts.output_or(format!("cci_{}", period));
    debug!(indicator = "cci", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        let cci = calculate_cci(t.numeric(HIGH)?, t.numeric(LOW)?, t.numeric(CLOSE)?, period)?;
        Ok(single(&output, cci))
    })
}

pub fn add_williams_r(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    validate(table, &[HIGH, LOW, CLOSE], opts)?;
    let output = opts.output_or(format!("williams_r_{}", period));
    debug!(indicator = "williams_r", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        let wr = calculate_williams_r(t.numeric(HIGH)?, t.numeric(LOW)?, t.numeric(CLOSE)?, period)?;
        Ok(single(&output, wr))
    })
}

pub fn add_atr(table: &Table, period: usize, opts: &AddOptions) -> Result<Table> {
    check_period("period", period)?;
    validate(table, &[HIGH, LOW, CLOSE], opts)?;
    let output = opts.output_or(format!("atr_{}", period));
    debug!(indicator = "atr", period, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        let atr = calculate_atr(t.numeric(HIGH)?, t.numeric(LOW)?, t.numeric(CLOSE)?, period)?;
        Ok(single(&output, atr))
    })
}

pub fn add_obv(table: &Table, opts: &AddOptions) -> Result<Table> {
    let source = opts.source_or_close();
    validate(table, &[source, VOLUME], opts)?;
    let output = opts.output_or("obv".to_string());
    debug!(indicator = "obv", output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_obv(t.numeric(source)?, t.numeric(VOLUME)?)?))
    })
}

pub fn add_vwap(table: &Table, opts: &AddOptions) -> Result<Table> {
    let source = opts.source_or_close();
    validate(table, &[source, VOLUME], opts)?;
    let output = opts.output_or("vwap".to_string());
    debug!(indicator = "vwap", output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        Ok(single(&output, calculate_vwap(t.numeric(source)?, t.numeric(VOLUME)?)?))
    })
}

/// Flag rows where `short` crosses `long`; default output `golden_cross` / `death_cross`
pub fn add_cross(
    table: &Table,
    direction: CrossDirection,
    short: &str,
    long: &str,
    opts: &AddOptions,
) -> Result<Table> {
    validate(table, &[short, long], opts)?;
    let output = opts.output_or(direction.column_name().to_string());
    debug!(indicator = "cross", %direction, short, long, output = %output, "adding column");

    apply_grouped(table, &opts.group_by, |t| {
        let flags = detect_cross(direction, t.numeric(short)?, t.numeric(long)?)?;
        Ok(vec![(output.clone(), Column::Flag(flags))])
    })
}
