use common::{check_period, Result, Series};

use super::rolling::is_undersized;

/// Calculate Exponential Moving Average with an SMA seed
///
/// Leading undefined values are skipped: the seed is the mean of the first
/// `period` values starting at the first defined one. After the seed each
/// value needs a defined input and a defined predecessor, so an undefined
/// input leaves every later value undefined.
///
/// # Arguments
/// * `prices` - Slice of prices, `None` for undefined
/// * `period` - EMA period, smoothing factor is 2 / (period + 1)
///
/// # Returns
/// Vector of EMA values, same length as `prices`
pub fn calculate_ema(prices: &[Option<f64>], period: usize) -> Result<Series> {
    check_period("period", period)?;
    let n = prices.len();
    let mut ema = vec![None; n];

    let Some(start) = prices.iter().position(Option::is_some) else {
        return Ok(ema);
    };
    if is_undersized(period, n - start) {
        return Ok(ema);
    }

    let seed_at = start + period - 1;
    let seed_window: Option<Vec<f64>> = prices[start..=seed_at].iter().copied().collect();
    let Some(seed_window) = seed_window else {
        return Ok(ema);
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut prev = seed_window.iter().sum::<f64>() / period as f64;
    ema[seed_at] = Some(prev);

    for i in (seed_at + 1)..n {
        let Some(price) = prices[i] else {
            break;
        };
        prev = multiplier * price + (1.0 - multiplier) * prev;
        ema[i] = Some(prev);
    }

    Ok(ema)
}
