pub mod loader;
pub mod synthetic;
pub mod writer;

pub use loader::{load_csv, load_json, read_csv};
pub use synthetic::{generate_multi_symbol_bars, generate_synthetic_bars};
pub use writer::{to_records, write_csv, write_json};

use std::path::Path;

use common::{IndicatorError, Result};

use crate::frame::Table;

/// Load a table from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(IndicatorError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}
