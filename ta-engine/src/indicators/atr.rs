use common::{Result, Series};

use super::ema::calculate_ema;
use super::ensure_same_length;

/// Calculate Average True Range
///
/// # Arguments
/// * `highs` - Slice of high prices
/// * `lows` - Slice of low prices
/// * `closes` - Slice of closing prices
/// * `period` - ATR period (typically 14)
///
/// # Returns
/// Vector of ATR values, the EMA of the true range series
pub fn calculate_atr(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
    period: usize,
) -> Result<Series> {
    let tr = true_range_series(highs, lows, closes)?;
    calculate_ema(&tr, period)
}

/// True Range for every bar; the first bar has no prior close and uses high - low
pub fn true_range_series(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
) -> Result<Series> {
    ensure_same_length(&[("high", highs), ("low", lows), ("close", closes)])?;

    Ok((0..highs.len())
        .map(|i| {
            let (high, low) = (highs[i]?, lows[i]?);
            if i == 0 {
                return Some(high - low);
            }
            closes[i - 1].map(|prev_close| true_range(high, low, prev_close))
        })
        .collect())
}

/// Calculate True Range for a single bar
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::series;

    #[test]
    fn test_atr_basic() {
        let highs = series(&[48.7, 48.72, 48.9, 48.87, 48.82, 49.05, 49.2, 49.35, 49.92, 50.19]);
        let lows = series(&[47.79, 48.14, 48.39, 48.37, 48.24, 48.64, 48.94, 48.86, 49.5, 49.87]);
        let closes = series(&[48.16, 48.61, 48.75, 48.63, 48.74, 49.03, 49.07, 49.32, 49.91, 50.13]);

        let atr = calculate_atr(&highs, &lows, &closes, 5).unwrap();

        assert_eq!(atr.len(), highs.len());
        assert!(atr[3].is_none());
        // ATR should be positive
        for value in &atr[4..] {
            assert!(value.unwrap() > 0.0);
        }
    }

    #[test]
    fn test_first_true_range_uses_high_low() {
        let tr = true_range_series(
            &series(&[10.0, 12.0]),
            &series(&[9.0, 11.5]),
            &series(&[9.5, 12.0]),
        )
        .unwrap();
        assert_eq!(tr[0], Some(1.0));
        // max(0.5, |12 - 9.5|, |11.5 - 9.5|) = 2.5
        assert_eq!(tr[1], Some(2.5));
    }

    #[test]
    fn test_true_range() {
        let tr = true_range(50.0, 48.0, 49.0);
        // TR should be max(50-48, |50-49|, |48-49|) = max(2, 1, 1) = 2
        assert_eq!(tr, 2.0);
    }

    #[test]
    fn test_true_range_gap_up() {
        // Gap up scenario
        let tr = true_range(52.0, 51.0, 48.0);
        // TR should be max(52-51, |52-48|, |51-48|) = max(1, 4, 3) = 4
        assert_eq!(tr, 4.0);
    }

    #[test]
    fn test_atr_non_negative() {
        let highs = series(&[5.0, 5.0, 6.0, 4.0, 7.0, 7.0, 6.5]);
        let lows = series(&[4.0, 5.0, 5.0, 3.0, 6.0, 7.0, 6.0]);
        let closes = series(&[4.5, 5.0, 5.5, 3.5, 6.5, 7.0, 6.2]);
        let atr = calculate_atr(&highs, &lows, &closes, 2).unwrap();
        assert!(atr.iter().flatten().all(|v| *v >= 0.0));
    }
}
