use std::collections::VecDeque;

use common::{check_period, Result, Series};
use tracing::warn;

/// Reduction applied to each trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    /// Sample standard deviation (n - 1 denominator)
    StdDev,
    Min,
    Max,
    /// mean(|x - mean(x)|)
    MeanAbsDev,
}

impl Reducer {
    fn reduce(self, window: &[f64]) -> Option<f64> {
        let len = window.len() as f64;
        let mean = window.iter().sum::<f64>() / len;
        match self {
            Reducer::Mean => Some(mean),
            Reducer::StdDev => {
                if window.len() < 2 {
                    return None;
                }
                let variance =
                    window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (len - 1.0);
                Some(variance.sqrt())
            }
            Reducer::Min => window.iter().copied().reduce(f64::min),
            Reducer::Max => window.iter().copied().reduce(f64::max),
            Reducer::MeanAbsDev => Some(window.iter().map(|x| (x - mean).abs()).sum::<f64>() / len),
        }
    }
}

/// Returns true (and logs) when the window cannot fit in the series at all.
pub(crate) fn is_undersized(period: usize, len: usize) -> bool {
    if period > len {
        warn!(period, len, "window period exceeds series length, output is undefined");
        return true;
    }
    false
}

/// Apply `reducer` over every right-aligned window of `period` values
///
/// # Arguments
/// * `series` - Input values, `None` for undefined
/// * `period` - Window length, must be at least 1
/// * `reducer` - Reduction to apply
///
/// # Returns
/// Series of the same length; a value is defined only when all `period`
/// inputs ending at that row are defined
pub fn rolling(series: &[Option<f64>], period: usize, reducer: Reducer) -> Result<Series> {
    check_period("period", period)?;
    let n = series.len();
    if is_undersized(period, n) {
        return Ok(vec![None; n]);
    }

    Ok(match reducer {
        Reducer::Min => sliding_extremum(series, period, false),
        Reducer::Max => sliding_extremum(series, period, true),
        Reducer::Mean | Reducer::StdDev | Reducer::MeanAbsDev => windowed(series, period, reducer),
    })
}

pub fn rolling_mean(series: &[Option<f64>], period: usize) -> Result<Series> {
    rolling(series, period, Reducer::Mean)
}

pub fn rolling_std(series: &[Option<f64>], period: usize) -> Result<Series> {
    rolling(series, period, Reducer::StdDev)
}

pub fn rolling_min(series: &[Option<f64>], period: usize) -> Result<Series> {
    rolling(series, period, Reducer::Min)
}

pub fn rolling_max(series: &[Option<f64>], period: usize) -> Result<Series> {
    rolling(series, period, Reducer::Max)
}

pub fn rolling_mean_abs_dev(series: &[Option<f64>], period: usize) -> Result<Series> {
    rolling(series, period, Reducer::MeanAbsDev)
}

fn window_is_defined(last_undefined: Option<usize>, start: usize) -> bool {
    last_undefined.map_or(true, |u| u < start)
}

// Monotonic deque of (index, value); an undefined input clears it since no
// later complete window can reach back past that row.
fn sliding_extremum(series: &[Option<f64>], period: usize, max: bool) -> Series {
    let n = series.len();
    let mut out = vec![None; n];
    let mut dq: VecDeque<(usize, f64)> = VecDeque::with_capacity(period);
    let mut last_undefined = None;

    for i in 0..n {
        match series[i] {
            Some(v) => {
                while let Some(&(_, back)) = dq.back() {
                    let dominated = if max { back <= v } else { back >= v };
                    if dominated {
                        dq.pop_back();
                    } else {
                        break;
                    }
                }
                dq.push_back((i, v));
            }
            None => {
                dq.clear();
                last_undefined = Some(i);
            }
        }

        if i + 1 < period {
            continue;
        }
        let start = i + 1 - period;
        while let Some(&(j, _)) = dq.front() {
            if j < start {
                dq.pop_front();
            } else {
                break;
            }
        }
        if window_is_defined(last_undefined, start) {
            out[i] = dq.front().map(|&(_, v)| v);
        }
    }

    out
}

// Each defined window is summed from scratch so a huge or non-finite value
// cannot leak into windows that no longer contain it.
fn windowed(series: &[Option<f64>], period: usize, reducer: Reducer) -> Series {
    let n = series.len();
    let mut out = vec![None; n];
    let mut buf = Vec::with_capacity(period);
    let mut last_undefined = None;

    for i in 0..n {
        if series[i].is_none() {
            last_undefined = Some(i);
        }
        if i + 1 < period {
            continue;
        }
        let start = i + 1 - period;
        if !window_is_defined(last_undefined, start) {
            continue;
        }
        buf.clear();
        buf.extend(series[start..=i].iter().flatten());
        out[i] = reducer.reduce(&buf);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use common::{series, IndicatorError};
    use std::sync::{Arc, Mutex};

    fn naive(values: &[Option<f64>], period: usize, reducer: Reducer) -> Series {
        (0..values.len())
            .map(|i| {
                if i + 1 < period {
                    return None;
                }
                let w: Option<Vec<f64>> = values[i + 1 - period..=i].iter().copied().collect();
                w.and_then(|w| reducer.reduce(&w))
            })
            .collect()
    }

    #[test]
    fn test_rolling_mean_example() {
        let x = series(&[100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0]);
        let out = rolling_mean(&x, 3).unwrap();

        assert_eq!(out.len(), x.len());
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert_eq!(out[2], Some(101.0));
        assert_relative_eq!(out[6].unwrap(), (105.0 + 104.0 + 106.0) / 3.0);
    }

    #[test]
    fn test_gap_blocks_every_window_that_contains_it() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)];
        for reducer in [
            Reducer::Mean,
            Reducer::Min,
            Reducer::Max,
            Reducer::StdDev,
            Reducer::MeanAbsDev,
        ] {
            let out = rolling(&x, 2, reducer).unwrap();
            assert!(out[1].is_some(), "{:?}", reducer);
            assert!(out[2].is_none(), "{:?}", reducer);
            assert!(out[3].is_none(), "{:?}", reducer);
            assert!(out[4].is_some(), "{:?}", reducer);
        }
    }

    #[test]
    fn test_mean_recovers_after_extreme_values() {
        let x = series(&[f64::NAN, 1.0, 2.0, 3.0, 4.0]);
        let out = rolling_mean(&x, 2).unwrap();
        assert!(out[1].unwrap().is_nan());
        assert_eq!(&out[2..], &[Some(1.5), Some(2.5), Some(3.5)]);
        assert_eq!(&out[2..], &naive(&x, 2, Reducer::Mean)[2..]);

        let x = series(&[1e16, 1.0, 1.0, 1.0, 1.0]);
        let out = rolling_mean(&x, 3).unwrap();
        assert_eq!(out[3], Some(1.0));
        assert_eq!(out[4], Some(1.0));
        assert_eq!(out, naive(&x, 3, Reducer::Mean));
    }

    #[test]
    fn test_extrema_match_naive_scan() {
        let x = vec![
            Some(3.0),
            Some(1.0),
            Some(4.0),
            Some(1.0),
            Some(5.0),
            None,
            Some(9.0),
            Some(2.0),
            Some(6.0),
            Some(5.0),
            Some(3.0),
            Some(5.0),
        ];
        for period in 1..=4 {
            assert_eq!(rolling_min(&x, period).unwrap(), naive(&x, period, Reducer::Min));
            assert_eq!(rolling_max(&x, period).unwrap(), naive(&x, period, Reducer::Max));
        }
    }

    #[test]
    fn test_sample_std_dev() {
        let x = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let out = rolling_std(&x, 8).unwrap();
        assert_relative_eq!(out[7].unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_single_value_window_is_undefined() {
        let x = series(&[1.0, 2.0, 3.0]);
        assert!(rolling_std(&x, 1).unwrap().iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_mean_abs_dev() {
        let x = series(&[1.0, 2.0, 3.0, 10.0]);
        let out = rolling_mean_abs_dev(&x, 3).unwrap();
        assert_relative_eq!(out[2].unwrap(), 2.0 / 3.0);
        // window [2, 3, 10], mean 5
        assert_relative_eq!(out[3].unwrap(), (3.0 + 2.0 + 5.0) / 3.0);
    }

    #[test]
    fn test_zero_period_is_invalid() {
        let x = series(&[1.0, 2.0]);
        let err = rolling_mean(&x, 0).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(_)));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_undersized_input_logs_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let out = tracing::subscriber::with_default(subscriber, || {
            rolling_mean(&series(&[1.0, 2.0]), 5).unwrap()
        });

        assert_eq!(out, vec![None, None]);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("window period exceeds series length"), "{}", logs);
    }

    #[test]
    fn test_period_larger_than_data() {
        let x = series(&[1.0, 2.0, 3.0]);
        let out = rolling_max(&x, 5).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.is_none()));
    }
}
