//! Per-metric ARIMA forecasting on a train/test split

use crate::config::AnalysisConfig;
use crate::data::FinancialSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::{forecast_accuracy, ForecastAccuracy};
use crate::models::arima::{ArimaModel, ArimaOrder, TrainedArimaModel};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::utils::train_test_split;
use serde::Serialize;
use tracing::{info, warn};

/// Fitted parameters reported alongside a forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub ar_coefficients: Vec<f64>,
    pub ma_coefficients: Vec<f64>,
    pub drift: f64,
    pub sigma2: f64,
}

impl From<&TrainedArimaModel> for ModelSummary {
    fn from(model: &TrainedArimaModel) -> Self {
        Self {
            name: model.name().to_string(),
            ar_coefficients: model.ar_coefficients().to_vec(),
            ma_coefficients: model.ma_coefficients().to_vec(),
            drift: model.drift(),
            sigma2: model.sigma2(),
        }
    }
}

/// Forecast of one metric over its held-out test segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricForecast {
    /// Metric (column) name
    pub metric: String,
    /// Forecast over the test horizon
    pub forecast: ForecastResult,
    /// Held-out actual values
    pub actual: Vec<f64>,
    /// Mean squared error of `forecast` against `actual`
    pub mse: f64,
    /// Further accuracy measures
    pub accuracy: ForecastAccuracy,
    /// Last forecast value, used downstream as the next-period prediction
    pub next_period: f64,
    /// Number of training observations
    pub train_len: usize,
    pub model: ModelSummary,
}

/// Outcome of forecasting a single metric
#[derive(Debug)]
pub enum MetricOutcome {
    Success(MetricForecast),
    Failure { metric: String, error: ForecastError },
}

impl MetricOutcome {
    pub fn metric(&self) -> &str {
        match self {
            MetricOutcome::Success(forecast) => &forecast.metric,
            MetricOutcome::Failure { metric, .. } => metric,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MetricOutcome::Success(_))
    }

    /// Convert into a plain result
    pub fn into_result(self) -> Result<MetricForecast> {
        match self {
            MetricOutcome::Success(forecast) => Ok(forecast),
            MetricOutcome::Failure { error, .. } => Err(error),
        }
    }
}

/// Fits one ARIMA model per metric
#[derive(Debug, Clone)]
pub struct Forecaster {
    model: ArimaModel,
    train_ratio: f64,
}

impl Forecaster {
    /// Create a forecaster for an order and train fraction
    pub fn new(order: ArimaOrder, train_ratio: f64) -> Result<Self> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "train_ratio must be between 0 and 1, got {}",
                train_ratio
            )));
        }

        Ok(Self {
            model: ArimaModel::new(order)?,
            train_ratio,
        })
    }

    /// Create a forecaster from configuration
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(config.arima_order, config.train_ratio)
    }

    /// Forecast one metric over its test segment
    pub fn forecast_metric(&self, series: &FinancialSeries, metric: &str) -> Result<MetricForecast> {
        let values = series.column(metric)?;
        let (train, test) = train_test_split(values, self.train_ratio);

        if train.is_empty() || test.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "{}: {} observations leave an empty train or test segment",
                metric,
                values.len()
            )));
        }

        let trained = self
            .model
            .train(&train)
            .map_err(|e| with_metric(metric, e))?;
        let forecast = trained
            .forecast(test.len())
            .map_err(|e| with_metric(metric, e))?;

        let accuracy = forecast_accuracy(forecast.values(), &test)?;
        let next_period = forecast.last().ok_or_else(|| {
            ForecastError::InsufficientData(format!("{}: empty forecast", metric))
        })?;

        info!(
            metric,
            model = trained.name(),
            mse = accuracy.mse,
            next_period,
            "trained forecasting model"
        );

        Ok(MetricForecast {
            metric: metric.to_string(),
            model: ModelSummary::from(&trained),
            forecast,
            actual: test,
            mse: accuracy.mse,
            accuracy,
            next_period,
            train_len: train.len(),
        })
    }

    /// Forecast every target, failing on the first metric that cannot be fitted
    pub fn forecast_all(&self, series: &FinancialSeries, targets: &[String]) -> Result<Vec<MetricForecast>> {
        targets
            .iter()
            .map(|metric| self.forecast_metric(series, metric))
            .collect()
    }

    /// Forecast every target, reporting each metric's outcome separately
    pub fn forecast_each(&self, series: &FinancialSeries, targets: &[String]) -> Vec<MetricOutcome> {
        targets
            .iter()
            .map(|metric| match self.forecast_metric(series, metric) {
                Ok(forecast) => MetricOutcome::Success(forecast),
                Err(error) => {
                    warn!(metric = metric.as_str(), %error, "forecast failed");
                    MetricOutcome::Failure {
                        metric: metric.clone(),
                        error,
                    }
                }
            })
            .collect()
    }
}

fn with_metric(metric: &str, error: ForecastError) -> ForecastError {
    match error {
        ForecastError::InsufficientData(msg) => {
            ForecastError::InsufficientData(format!("{}: {}", metric, msg))
        }
        other => other,
    }
}
