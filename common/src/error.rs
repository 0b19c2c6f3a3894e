use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing required column(s): {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    #[error("Length mismatch for {column}: expected {expected} rows, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IndicatorError {
    pub fn missing<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumn {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Reject window periods below one.
pub fn check_period(name: &str, period: usize) -> Result<()> {
    if period < 1 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} must be at least 1, got {}",
            name, period
        )));
    }
    Ok(())
}
