pub mod augment;
pub mod data;
pub mod frame;
pub mod indicators;
pub mod partition;
pub mod pipeline;
pub mod signals;

pub use augment::{
    add_atr, add_bollinger, add_cci, add_cross, add_ema, add_macd, add_momentum, add_obv,
    add_returns, add_rsi, add_sma, add_stochastic, add_vwap, add_williams_r, AddOptions,
};
pub use data::{generate_multi_symbol_bars, generate_synthetic_bars, load_file};
pub use frame::{Column, Table};
pub use partition::GroupBy;
pub use pipeline::IndicatorPipeline;
pub use signals::{cross_indices, detect_cross};

// Re-export common types
pub use common::{
    Bar, CrossDirection, IndicatorError, IndicatorParameters, Result, ReturnType, Series,
};
