//! Descriptive statistics
//!
//! Contains the summary used for statistics exports:
//! - Count, mean and sample standard deviation
//! - Minimum and maximum
//! - Quartiles with linear interpolation between order statistics

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Summary statistics of a single numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of observations
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (NaN for a single observation)
    pub std: f64,
    /// Smallest observation
    pub min: f64,
    /// First quartile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q75: f64,
    /// Largest observation
    pub max: f64,
}

impl Summary {
    /// Row labels in export order
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in the same order as [`Summary::LABELS`]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Calculate the arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the sample standard deviation (n - 1 denominator)
///
/// A single observation has no spread estimate and yields NaN.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    if values.len() < 2 {
        return Ok(f64::NAN);
    }

    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Ok(variance.sqrt())
}

/// Quantile of already sorted values using linear interpolation
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take a quantile of an empty series".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be within [0, 1], got {}",
            q
        )));
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Summarise a column the way a tabular `describe` does
pub fn describe(values: &[f64]) -> Result<Summary> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Series contains non-finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(Summary {
        count: values.len(),
        mean: mean(values)?,
        std: sample_std_dev(values)?,
        min: sorted[0],
        q25: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q75: quantile(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}
