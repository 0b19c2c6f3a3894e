use common::{Result, Series};

use super::ensure_same_length;
use super::rolling::{rolling_max, rolling_min};
use super::sma::calculate_sma;

/// Stochastic oscillator result
#[derive(Debug, Clone)]
pub struct Stochastic {
    pub k: Series,
    pub d: Series,
}

/// Calculate the Stochastic Oscillator
///
/// `%K = 100 * (close - LL) / (HH - LL)` over `period` bars, `%D` is the SMA
/// of `%K` over `smooth` bars. A flat range (HH == LL) leaves %K undefined.
pub fn calculate_stochastic(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
    period: usize,
    smooth: usize,
) -> Result<Stochastic> {
    ensure_same_length(&[("high", highs), ("low", lows), ("close", closes)])?;

    let highest = rolling_max(highs, period)?;
    let lowest = rolling_min(lows, period)?;

    let k: Series = (0..closes.len())
        .map(|i| match (closes[i], highest[i], lowest[i]) {
            (Some(c), Some(hh), Some(ll)) if hh != ll => Some(100.0 * (c - ll) / (hh - ll)),
            _ => None,
        })
        .collect();
    let d = calculate_sma(&k, smooth)?;

    Ok(Stochastic { k, d })
}
