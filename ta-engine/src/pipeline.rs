use std::time::Instant;

use common::{CrossDirection, IndicatorParameters, Result};
use tracing::info;

use crate::augment::{
    add_atr, add_bollinger, add_cci, add_cross, add_ema, add_macd, add_momentum, add_obv,
    add_returns, add_rsi, add_sma, add_stochastic, add_vwap, add_williams_r, AddOptions,
};
use crate::frame::{Table, CLOSE, HIGH, LOW, VOLUME};
use crate::partition::GroupBy;

/// Applies every indicator enabled in [`IndicatorParameters`] to a table
pub struct IndicatorPipeline {
    params: IndicatorParameters,
}

impl IndicatorPipeline {
    pub fn new(params: IndicatorParameters) -> Self {
        Self { params }
    }

    /// Columns the enabled indicators read
    pub fn required_columns(&self) -> Vec<&str> {
        let p = &self.params;
        let mut cols = vec![p.source.as_str()];
        if p.stoch_enabled || p.cci_enabled || p.williams_r_enabled || p.atr_enabled {
            cols.extend([HIGH, LOW, CLOSE]);
        }
        if p.obv_enabled || p.vwap_enabled {
            cols.push(VOLUME);
        }
        if let Some(key) = &p.group_by {
            cols.push(key);
        }
        cols
    }

    /// Run all enabled indicators; fails before computing anything if the
    /// parameters or the table schema are invalid
    pub fn run(&self, table: &Table) -> Result<Table> {
        let start_time = Instant::now();
        let p = &self.params;
        p.validate()?;
        table.require(&self.required_columns())?;

        let opts = AddOptions::new()
            .source(p.source.clone())
            .group_by(GroupBy::from(p.group_by.clone()));

        let mut out = table.clone();
        for &period in &p.sma_periods {
            out = add_sma(&out, period, &opts)?;
        }
        for &period in &p.ema_periods {
            out = add_ema(&out, period, &opts)?;
        }
        if p.rsi_enabled {
            out = add_rsi(&out, p.rsi_period, &opts)?;
        }
        if p.macd_enabled {
            out = add_macd(&out, p.macd_fast, p.macd_slow, p.macd_signal, &opts)?;
        }
        if p.stoch_enabled {
            out = add_stochastic(&out, p.stoch_period, p.stoch_smooth, &opts)?;
        }
        if p.cci_enabled {
            out = add_cci(&out, p.cci_period, &opts)?;
        }
        if p.williams_r_enabled {
            out = add_williams_r(&out, p.williams_r_period, &opts)?;
        }
        if p.momentum_enabled {
            out = add_momentum(&out, p.momentum_period, &opts)?;
        }
        if p.returns_enabled {
            out = add_returns(&out, p.return_type, &opts)?;
        }
        if p.bb_enabled {
            out = add_bollinger(&out, p.bb_period, p.bb_std_dev, &opts)?;
        }
        if p.atr_enabled {
            out = add_atr(&out, p.atr_period, &opts)?;
        }
        if p.obv_enabled {
            out = add_obv(&out, &opts)?;
        }
        if p.vwap_enabled {
            out = add_vwap(&out, &opts)?;
        }
        if p.cross_enabled {
            out = self.add_crosses(&out, &opts)?;
        }

        info!(
            rows = out.len(),
            columns = out.column_names().len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "indicators computed"
        );
        Ok(out)
    }

    /// Golden and death crosses of the fast SMA against the slow SMA
    fn add_crosses(&self, table: &Table, opts: &AddOptions) -> Result<Table> {
        let p = &self.params;
        let fast = format!("sma_{}", p.cross_fast_period);
        let slow = format!("sma_{}", p.cross_slow_period);

        let mut out = table.clone();
        for (name, period) in [(&fast, p.cross_fast_period), (&slow, p.cross_slow_period)] {
            if !out.contains(name) {
                out = add_sma(&out, period, opts)?;
            }
        }
        out = add_cross(&out, CrossDirection::Golden, &fast, &slow, opts)?;
        add_cross(&out, CrossDirection::Death, &fast, &slow, opts)
    }
}
