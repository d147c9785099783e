//! Runtime configuration
//!
//! Configuration is built once at startup, from a TOML file or defaults, and
//! passed explicitly to the pipeline and the request handler.

use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use crate::report::ChartFormat;
use crate::schema::TARGET_METRICS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "MACRO_FORECAST_CONFIG";

/// Settings for the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory receiving `predictions_<run_id>.csv`
    pub results_dir: PathBuf,
    /// Directory receiving charts and statistics exports
    pub visualizations_dir: PathBuf,
    /// Fraction of each series used for training
    pub train_ratio: f64,
    /// ARIMA order fitted to every target
    pub arima_order: ArimaOrder,
    /// Metrics to forecast and adjust
    pub targets: Vec<String>,
    /// Output format of rendered charts
    pub chart_format: ChartFormat,
    /// Append a random suffix to run identifiers
    pub unique_run_ids: bool,
    /// Upload handling
    pub service: ServiceConfig,
}

/// Settings for the upload-facing request handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory where uploads are staged while a request runs
    pub uploads_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Accepted file extensions, lower case
    pub allowed_extensions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            visualizations_dir: PathBuf::from("visualizations"),
            train_ratio: 0.8,
            arima_order: ArimaOrder::default(),
            targets: TARGET_METRICS.iter().map(|m| m.to_string()).collect(),
            chart_format: ChartFormat::default(),
            unique_run_ids: false,
            service: ServiceConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string(), "csv".to_string()],
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from TOML text; absent keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from an explicit path, else from `MACRO_FORECAST_CONFIG`, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(env_path) if !env_path.is_empty() => Self::from_file(env_path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "train_ratio must be between 0 and 1, got {}",
                self.train_ratio
            )));
        }
        if self.targets.is_empty() {
            return Err(ForecastError::ConfigError(
                "at least one target metric is required".to_string(),
            ));
        }
        if self.service.max_upload_bytes == 0 {
            return Err(ForecastError::ConfigError(
                "max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
