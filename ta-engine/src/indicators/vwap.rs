use common::{Result, Series};

use super::ensure_same_length;

/// Calculate cumulative Volume Weighted Average Price
///
/// Running `sum(close * volume) / sum(volume)` over rows where both are
/// defined; undefined until some positive volume has traded.
pub fn calculate_vwap(closes: &[Option<f64>], volumes: &[Option<f64>]) -> Result<Series> {
    ensure_same_length(&[("close", closes), ("volume", volumes)])?;

    let mut pv = 0.0;
    let mut vol = 0.0;

    Ok(closes
        .iter()
        .zip(volumes)
        .map(|(c, v)| {
            if let (Some(c), Some(v)) = (c, v) {
                pv += c * v;
                vol += v;
            }
            (vol > 0.0).then(|| pv / vol)
        })
        .collect())
}
