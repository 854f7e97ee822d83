//! Error types for rusty_chartbot

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for chart preparation and its collaborators
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Division by zero: benchmark close is 0 on {date}")]
    DivisionByZero { date: NaiveDate },

    #[error("Insufficient data for {indicator}: required {required} bars, available {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Empty window: no aligned rows to chart")]
    EmptyWindow,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ChartError {
    /// True for failures caused by the price data itself; retrying the same input cannot succeed
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ChartError::DivisionByZero { .. }
                | ChartError::InsufficientData { .. }
                | ChartError::EmptyWindow
        )
    }
}

/// Result type alias for rusty_chartbot operations
pub type Result<T> = std::result::Result<T, ChartError>;
