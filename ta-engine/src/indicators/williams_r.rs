use common::{Result, Series};

use super::ensure_same_length;
use super::rolling::{rolling_max, rolling_min};

/// Calculate Williams %R
///
/// `-100 * (HH - close) / (HH - LL)`, in [-100, 0]; a flat range is undefined.
pub fn calculate_williams_r(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
    period: usize,
) -> Result<Series> {
    ensure_same_length(&[("high", highs), ("low", lows), ("close", closes)])?;

    let highest = rolling_max(highs, period)?;
    let lowest = rolling_min(lows, period)?;

    Ok((0..closes.len())
        .map(|i| match (closes[i], highest[i], lowest[i]) {
            (Some(c), Some(hh), Some(ll)) if hh != ll => Some(-100.0 * (hh - c) / (hh - ll)),
            _ => None,
        })
        .collect())
}
