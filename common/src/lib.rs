pub mod config;
pub mod error;
pub mod types;

pub use config::IndicatorParameters;
pub use error::{check_period, IndicatorError, Result};
pub use types::*;
