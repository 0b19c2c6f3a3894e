pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod momentum;
pub mod obv;
pub mod returns;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;
pub mod williams_r;

pub use atr::{calculate_atr, true_range, true_range_series};
pub use bollinger::{bandwidth, calculate_bollinger_bands, percent_b, BollingerBands};
pub use cci::{calculate_cci, typical_price};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, Macd};
pub use momentum::calculate_momentum;
pub use obv::calculate_obv;
pub use returns::calculate_returns;
pub use rolling::{
    rolling, rolling_max, rolling_mean, rolling_mean_abs_dev, rolling_min, rolling_std, Reducer,
};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{calculate_stochastic, Stochastic};
pub use vwap::calculate_vwap;
pub use williams_r::calculate_williams_r;

use common::{IndicatorError, Result};

/// Multi-input indicators need aligned inputs; the first entry sets the length.
pub(crate) fn ensure_same_length(inputs: &[(&str, &[Option<f64>])]) -> Result<()> {
    let Some((_, first)) = inputs.first() else {
        return Ok(());
    };
    for (name, values) in &inputs[1..] {
        if values.len() != first.len() {
            return Err(IndicatorError::LengthMismatch {
                column: name.to_string(),
                expected: first.len(),
                actual: values.len(),
            });
        }
    }
    Ok(())
}
