use common::{Result, Series};

use super::ensure_same_length;
use super::rolling::rolling_mean_abs_dev;
use super::sma::calculate_sma;

/// Lambert's constant, scales CCI so most values fall within ±100
pub const CCI_CONSTANT: f64 = 0.015;

/// Typical price (high + low + close) / 3
pub fn typical_price(highs: &[Option<f64>], lows: &[Option<f64>], closes: &[Option<f64>]) -> Series {
    highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| match (h, l, c) {
            (Some(h), Some(l), Some(c)) => Some((h + l + c) / 3.0),
            _ => None,
        })
        .collect()
}

/// Calculate Commodity Channel Index
///
/// `(TP - SMA(TP)) / (0.015 * MAD(TP))`; undefined when the mean deviation is zero.
pub fn calculate_cci(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
    period: usize,
) -> Result<Series> {
    ensure_same_length(&[("high", highs), ("low", lows), ("close", closes)])?;

    let tp = typical_price(highs, lows, closes);
    let sma = calculate_sma(&tp, period)?;
    let mad = rolling_mean_abs_dev(&tp, period)?;

    Ok((0..tp.len())
        .map(|i| match (tp[i], sma[i], mad[i]) {
            (Some(tp), Some(sma), Some(mad)) if mad != 0.0 => {
                Some((tp - sma) / (CCI_CONSTANT * mad))
            }
            _ => None,
        })
        .collect())
}
