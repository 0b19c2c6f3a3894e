use common::{ReturnType, Series};

/// Calculate period-over-period returns
///
/// The first row has no predecessor and is undefined, as is any row whose
/// predecessor is undefined or zero.
pub fn calculate_returns(prices: &[Option<f64>], return_type: ReturnType) -> Series {
    let mut out = vec![None; prices.len()];

    for i in 1..prices.len() {
        if let (Some(prev), Some(cur)) = (prices[i - 1], prices[i]) {
            if prev == 0.0 {
                continue;
            }
            out[i] = match return_type {
                ReturnType::Simple => Some(cur / prev - 1.0),
                ReturnType::Log if cur / prev > 0.0 => Some((cur / prev).ln()),
                ReturnType::Log => None,
            };
        }
    }

    out
}
