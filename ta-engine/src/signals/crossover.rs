use common::{CrossDirection, IndicatorError, Result};

/// Detect crossings of `short` over (golden) or under (death) `long`
///
/// # Arguments
/// * `direction` - Which crossing to flag
/// * `short` - Faster series, e.g. a short SMA
/// * `long` - Slower series, aligned with `short`
///
/// # Returns
/// One flag per row. The first row and any row whose before/after comparison
/// touches an undefined value are `false`.
pub fn detect_cross(
    direction: CrossDirection,
    short: &[Option<f64>],
    long: &[Option<f64>],
) -> Result<Vec<bool>> {
    if short.len() != long.len() {
        return Err(IndicatorError::LengthMismatch {
            column: "long".to_string(),
            expected: short.len(),
            actual: long.len(),
        });
    }

    let mut flags = vec![false; short.len()];
    for i in 1..short.len() {
        let (Some(s0), Some(l0), Some(s1), Some(l1)) = (short[i - 1], long[i - 1], short[i], long[i])
        else {
            continue;
        };
        flags[i] = match direction {
            CrossDirection::Golden => s0 <= l0 && s1 > l1,
            CrossDirection::Death => s0 >= l0 && s1 < l1,
        };
    }

    Ok(flags)
}

/// Row indices where a cross of `direction` fires
pub fn cross_indices(
    direction: CrossDirection,
    short: &[Option<f64>],
    long: &[Option<f64>],
) -> Result<Vec<usize>> {
    Ok(detect_cross(direction, short, long)?
        .iter()
        .enumerate()
        .filter_map(|(i, fired)| fired.then_some(i))
        .collect())
}
