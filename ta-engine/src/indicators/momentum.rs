use common::{check_period, Result, Series};

use super::rolling::is_undersized;

/// Calculate rate-of-change momentum
///
/// `100 * (price[i] / price[i - period] - 1)`. Undefined for the first
/// `period` rows, when either price is undefined, or when the base is zero.
///
/// # Arguments
/// * `prices` - Slice of prices
/// * `period` - Look-back in rows
pub fn calculate_momentum(prices: &[Option<f64>], period: usize) -> Result<Series> {
    check_period("period", period)?;
    let n = prices.len();
    let mut out = vec![None; n];
    if is_undersized(period + 1, n) {
        return Ok(out);
    }

    for i in period..n {
        if let (Some(base), Some(cur)) = (prices[i - period], prices[i]) {
            if base != 0.0 {
                out[i] = Some(100.0 * (cur / base - 1.0));
            }
        }
    }

    Ok(out)
}
