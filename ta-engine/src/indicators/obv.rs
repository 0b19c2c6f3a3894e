use common::{Result, Series};

use super::ensure_same_length;

/// Calculate On-Balance Volume
///
/// Starts at zero on the first row whatever its volume. Each later row adds
/// its volume when the close rose, subtracts it when the close fell, and
/// carries the previous total when unchanged. An undefined close on either
/// side counts as unchanged and an undefined volume adds nothing, so the
/// result is always defined.
pub fn calculate_obv(closes: &[Option<f64>], volumes: &[Option<f64>]) -> Result<Series> {
    ensure_same_length(&[("close", closes), ("volume", volumes)])?;

    let mut obv = Vec::with_capacity(closes.len());
    let mut total = 0.0;

    for i in 0..closes.len() {
        if i > 0 {
            let volume = volumes[i].unwrap_or(0.0);
            match (closes[i - 1], closes[i]) {
                (Some(prev), Some(cur)) if cur > prev => total += volume,
                (Some(prev), Some(cur)) if cur < prev => total -= volume,
                _ => {}
            }
        }
        obv.push(Some(total));
    }

    Ok(obv)
}
