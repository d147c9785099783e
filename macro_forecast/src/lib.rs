//! # Macro Forecast
//!
//! A Rust library for forecasting company financial metrics and adjusting the
//! forecasts for macroeconomic assumptions.
//!
//! ## Features
//!
//! - Loading financial tables from CSV uploads or tables inside PDF documents
//! - Schema and value validation of the `Date, Inflation_Rate, Interest_Rate,
//!   Revenue_Growth, Profit_Margin, Cash_Flow` layout
//! - ARIMA(p,d,q) forecasts per metric on a train/test split, with MSE
//! - Inflation, interest and growth adjustment of the next-period forecast
//! - CSV exports and PNG charts (SVG through `chart_format = "svg"`)
//! - A framework-independent upload handler with 400/413/500 classification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use macro_forecast::{analyze, AnalysisConfig, SourceFormat, SystemClock, UserParameters};
//!
//! let bytes = std::fs::read("financials.csv")?;
//! let params = UserParameters::new(5.0, 3.0, 1.1)?;
//! let config = AnalysisConfig::default();
//!
//! let report = analyze(&bytes, SourceFormat::DelimitedText, &params, &config, &SystemClock)?;
//! for prediction in &report.predictions {
//!     println!("{}: {} -> {}", prediction.metric, prediction.original, prediction.adjusted);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adjustment;
pub mod clock;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod forecaster;
pub mod formatting;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod service;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use crate::adjustment::adjust;
pub use crate::clock::{Clock, FixedClock, RunId, SystemClock};
pub use crate::config::{AnalysisConfig, ServiceConfig};
pub use crate::data::{DataLoader, FinancialSeries, LoadedTable, SourceFormat};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::{Forecaster, MetricForecast, MetricOutcome};
pub use crate::formatting::{change_percent, AdjustedPrediction, ResultFormatter};
pub use crate::models::arima::{ArimaModel, ArimaOrder};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{analyze, describe, AnalysisReport, DescribeReport};
pub use crate::report::{ChartFormat, ReportWriter, VisualizationManifest};
pub use crate::service::{AnalysisRequest, AnalysisResponse, Service, UploadedFile};
pub use crate::validation::{UserParameters, Validator};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
