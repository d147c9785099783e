//! Linear trend fitting
//!
//! Ordinary least squares of a series against its observation index, used to
//! draw trend lines over each metric.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted straight line `intercept + slope * index`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    /// Change per observation
    pub slope: f64,
    /// Value at index zero
    pub intercept: f64,
}

impl LinearTrend {
    /// Value of the trend line at an observation index
    pub fn value_at(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }

    /// Trend values for indices `0..len`
    pub fn fitted(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.value_at(i as f64)).collect()
    }
}

/// Linear Regression over the observation index
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    trend: Option<LinearTrend>,
}

impl LinearRegression {
    /// Create an unfitted regression
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the regression to a full series
    pub fn fit(&mut self, values: &[f64]) -> Result<LinearTrend> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for a trend. Need at least 2 points.".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if !numerator.is_finite() {
            return Err(MathError::CalculationError(
                "Series contains non-finite values".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let trend = LinearTrend {
            slope,
            intercept: y_mean - slope * x_mean,
        };
        self.trend = Some(trend);

        Ok(trend)
    }

    /// The last fitted trend
    pub fn trend(&self) -> Result<LinearTrend> {
        self.trend.ok_or_else(|| {
            MathError::InsufficientData("Regression has not been fitted".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let mut regression = LinearRegression::new();
        let trend = regression.fit(&[3.0, 5.0, 7.0, 9.0]).unwrap();

        assert_relative_eq!(trend.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(trend.intercept, 3.0, epsilon = 1e-12);
        assert_relative_eq!(trend.value_at(10.0), 23.0, epsilon = 1e-12);
        assert_eq!(trend.fitted(3).len(), 3);
    }

    #[test]
    fn test_unfitted_and_short_series() {
        let mut regression = LinearRegression::new();
        assert!(regression.trend().is_err());
        assert!(regression.fit(&[1.0]).is_err());
    }
}
