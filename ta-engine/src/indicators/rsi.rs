use common::{Result, Series};

use super::ema::calculate_ema;

/// RSI when both average gain and average loss are zero (flat prices)
pub const RSI_NEUTRAL: f64 = 50.0;

/// Calculate Relative Strength Index
///
/// Average gains and losses are EMAs (smoothing 2 / (period + 1)) of the
/// per-step price deltas; the first row has no delta and is undefined.
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `period` - RSI period (typically 14)
///
/// # Returns
/// Vector of RSI values in [0, 100], undefined during warm-up
pub fn calculate_rsi(prices: &[Option<f64>], period: usize) -> Result<Series> {
    let n = prices.len();
    let mut gains = vec![None; n];
    let mut losses = vec![None; n];

    for i in 1..n {
        if let (Some(prev), Some(cur)) = (prices[i - 1], prices[i]) {
            let delta = cur - prev;
            gains[i] = Some(delta.max(0.0));
            losses[i] = Some((-delta).max(0.0));
        }
    }

    let avg_gains = calculate_ema(&gains, period)?;
    let avg_losses = calculate_ema(&losses, period)?;

    Ok(avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rsi_from_averages(*g, *l)),
            _ => None,
        })
        .collect())
}

/// RSI from average gain and loss, resolving the zero-loss cases
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return RSI_NEUTRAL;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::series;

    #[test]
    fn test_rsi_basic() {
        let prices = series(&[44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.0, 43.5, 44.25, 44.5]);
        let rsi = calculate_rsi(&prices, 2).unwrap();

        assert_eq!(rsi.len(), prices.len());
        // delta starts at index 1, seed lands on index 2
        assert!(rsi[0].is_none());
        assert!(rsi[1].is_none());
        assert!(rsi[2].is_some());
        for val in rsi.iter().flatten() {
            assert!(*val >= 0.0 && *val <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let rsi = calculate_rsi(&prices, 2).unwrap();

        assert_eq!(rsi[rsi.len() - 1], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices = series(&[15.0, 14.0, 13.0, 12.0, 11.0, 10.0]);
        let rsi = calculate_rsi(&prices, 2).unwrap();

        assert_eq!(rsi[rsi.len() - 1], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let prices = series(&[10.0; 8]);
        let rsi = calculate_rsi(&prices, 3).unwrap();

        assert!(rsi[..3].iter().all(|v| v.is_none()));
        assert!(rsi[3..].iter().all(|v| *v == Some(RSI_NEUTRAL)));
    }

    #[test]
    fn test_rsi_known_value() {
        // deltas +1, -1 → avg gain 0.5, avg loss 0.5 at period 2
        let prices = series(&[10.0, 11.0, 10.0]);
        let rsi = calculate_rsi(&prices, 2).unwrap();
        assert_eq!(rsi[2], Some(50.0));
    }

    #[test]
    fn test_rsi_from_averages() {
        assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_averages(1.5, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 2.0), 0.0);
        assert_eq!(rsi_from_averages(1.0, 1.0), 50.0);
    }
}
