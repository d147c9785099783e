//! Error types for the macro_forecast crate

use econ_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the macro_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Upload is neither a delimited table nor a supported document
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Required columns absent from the input table
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Missing, non-numeric or otherwise malformed values
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// User parameters that do not parse as numbers
    #[error("Invalid parameter values: {0}")]
    InvalidParameters(String),

    /// User parameters outside their permitted range
    #[error("Parameter out of range: {field} {reason}")]
    ParameterOutOfRange { field: String, reason: String },

    /// Not enough observations to fit, or the fit did not converge
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Percent change requested against a zero prediction
    #[error("Change percent is undefined for {0}: original prediction is zero")]
    ZeroBaseline(String),

    /// Chart or export could not be written
    #[error("Render error: {0}")]
    RenderError(String),

    /// Catch-all for failures that are not the caller's fault
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Error from loading configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from CSV serialization
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl ForecastError {
    /// Whether the failure was caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::UnsupportedFormat(_)
                | ForecastError::MissingColumns(_)
                | ForecastError::InvalidData(_)
                | ForecastError::InvalidParameters(_)
                | ForecastError::ParameterOutOfRange { .. }
        )
    }

    /// HTTP-equivalent status for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            other => ForecastError::InternalError(other.to_string()),
        }
    }
}
