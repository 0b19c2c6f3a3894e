use common::{IndicatorError, Result, Series};

use super::rolling::rolling_std;
use super::sma::calculate_sma;

/// Bollinger Bands result
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BollingerBands {
    /// %B for each row, undefined where a band or the price is undefined
    pub fn percent_b(&self, prices: &[Option<f64>]) -> Series {
        prices
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(p, (l, u))| match (p, l, u) {
                (Some(p), Some(l), Some(u)) => Some(percent_b(*p, *l, *u)),
                _ => None,
            })
            .collect()
    }

    /// Band width relative to the middle band for each row
    pub fn bandwidth(&self) -> Series {
        (0..self.middle.len())
            .map(|i| match (self.upper[i], self.middle[i], self.lower[i]) {
                (Some(u), Some(m), Some(l)) => Some(bandwidth(u, m, l)),
                _ => None,
            })
            .collect()
    }
}

/// Calculate Bollinger Bands
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `period` - Period for moving average (typically 20)
/// * `std_dev` - Number of sample standard deviations (typically 2.0)
///
/// # Returns
/// BollingerBands struct containing upper, middle (SMA), and lower bands
pub fn calculate_bollinger_bands(
    prices: &[Option<f64>],
    period: usize,
    std_dev: f64,
) -> Result<BollingerBands> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "band multiplier must be a non-negative number, got {}",
            std_dev
        )));
    }

    let middle = calculate_sma(prices, period)?;
    let std = rolling_std(prices, period)?;

    let (upper, lower): (Series, Series) = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + std_dev * s), Some(m - std_dev * s)),
            _ => (None, None),
        })
        .unzip();

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}

/// Calculate %B indicator (position within bands)
/// Returns value between 0 and 1 when within bands
/// < 0 means below lower band, > 1 means above upper band
pub fn percent_b(price: f64, lower: f64, upper: f64) -> f64 {
    if upper == lower {
        return 0.5;
    }
    (price - lower) / (upper - lower)
}

/// Calculate bandwidth (volatility indicator)
pub fn bandwidth(upper: f64, middle: f64, lower: f64) -> f64 {
    if middle == 0.0 {
        return 0.0;
    }
    (upper - lower) / middle
}
