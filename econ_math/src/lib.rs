//! # Econ Math
//!
//! Numeric building blocks for the macro forecasting pipeline.
//! This crate provides descriptive statistics, correlation, linear trend
//! fitting and series differencing over plain `f64` slices.

use thiserror::Error;

pub mod correlation;
pub mod differencing;
pub mod regression;
pub mod statistics;

pub use correlation::{correlation_matrix, pearson};
pub use differencing::{difference, undifference, DifferencedSeries};
pub use regression::{LinearRegression, LinearTrend};
pub use statistics::{describe, mean, quantile, sample_std_dev, Summary};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
