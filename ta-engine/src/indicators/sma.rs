use common::{Result, Series};

use super::rolling::rolling_mean;

/// Calculate Simple Moving Average
///
/// # Arguments
/// * `prices` - Slice of prices, `None` for undefined
/// * `period` - SMA period
///
/// # Returns
/// Vector of Option<f64>, None until `period` defined values are available
pub fn calculate_sma(prices: &[Option<f64>], period: usize) -> Result<Series> {
    rolling_mean(prices, period)
}
