//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Missing required column, unparseable timestamp or quantity, malformed model file
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// The requested (customer, product) pair has no transactions in the loaded window
    #[error("No history for customer '{customer}' and product '{product}'")]
    GroupNotFound { customer: String, product: String },

    /// Month number outside 1..=12
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error raised by a predictor
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForecastError {
    /// True when the error means "nothing to predict from" rather than a failure
    pub fn is_no_history(&self) -> bool {
        matches!(self, ForecastError::GroupNotFound { .. })
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
