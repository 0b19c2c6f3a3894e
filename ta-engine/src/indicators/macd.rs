use common::{Result, Series};

use super::ema::calculate_ema;

/// MACD result
#[derive(Debug, Clone)]
pub struct Macd {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Calculate Moving Average Convergence/Divergence
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `fast` - Fast EMA period (typically 12)
/// * `slow` - Slow EMA period (typically 26)
/// * `signal` - Signal line EMA period (typically 9)
///
/// # Returns
/// Macd struct with the MACD line, its signal line and the histogram
pub fn calculate_macd(
    prices: &[Option<f64>],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<Macd> {
    let fast_ema = calculate_ema(prices, fast)?;
    let slow_ema = calculate_ema(prices, slow)?;

    let macd = difference(&fast_ema, &slow_ema);
    // The MACD line's warm-up is leading, so the signal seeds on its first full window
    let signal_line = calculate_ema(&macd, signal)?;
    let histogram = difference(&macd, &signal_line);

    Ok(Macd {
        macd,
        signal: signal_line,
        histogram,
    })
}

fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}
