//! Packaging adjusted predictions into fixed-field records

use crate::adjustment::adjust;
use crate::clock::Clock;
use crate::error::{ForecastError, Result};
use crate::forecaster::MetricForecast;
use crate::validation::UserParameters;
use serde::{Deserialize, Serialize};

/// Format of the capture timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Original vs adjusted next-period prediction for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedPrediction {
    pub metric: String,
    pub original: f64,
    pub adjusted: f64,
    pub change_percent: f64,
    pub timestamp: String,
}

/// Percent change from `original` to `adjusted`
pub fn change_percent(metric: &str, original: f64, adjusted: f64) -> Result<f64> {
    if original == 0.0 {
        return Err(ForecastError::ZeroBaseline(metric.to_string()));
    }

    let change = (adjusted - original) / original * 100.0;
    if !change.is_finite() {
        return Err(ForecastError::InternalError(format!(
            "Change percent for {} is not finite",
            metric
        )));
    }

    Ok(change)
}

/// Builds [`AdjustedPrediction`] records stamped with a clock
pub struct ResultFormatter<'a> {
    clock: &'a dyn Clock,
}

impl<'a> ResultFormatter<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Package one prediction pair
    pub fn format(&self, metric: &str, original: f64, adjusted: f64) -> Result<AdjustedPrediction> {
        Ok(AdjustedPrediction {
            metric: metric.to_string(),
            original,
            adjusted,
            change_percent: change_percent(metric, original, adjusted)?,
            timestamp: self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }

    /// Adjust each forecast's next-period value and package the pair
    pub fn format_all(
        &self,
        forecasts: &[MetricForecast],
        params: &UserParameters,
    ) -> Result<Vec<AdjustedPrediction>> {
        forecasts
            .iter()
            .map(|forecast| {
                let adjusted = adjust(&forecast.metric, forecast.next_period, params)?;
                self.format(&forecast.metric, forecast.next_period, adjusted)
            })
            .collect()
    }
}
