//! End-to-end analysis of one uploaded dataset
//!
//! `analyze` is a pure function of its inputs apart from the files it writes:
//! load → validate → forecast → adjust → format → persist.

use crate::clock::{Clock, RunId};
use crate::config::AnalysisConfig;
use crate::data::{DataLoader, FinancialSeries, SourceFormat};
use crate::error::{ForecastError, Result};
use crate::forecaster::{Forecaster, MetricForecast};
use crate::formatting::{AdjustedPrediction, ResultFormatter};
use crate::report::{ReportWriter, VisualizationManifest};
use crate::validation::{UserParameters, Validator};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything produced by one analysis run
#[derive(Debug)]
pub struct AnalysisReport {
    pub run_id: RunId,
    /// One record per target metric, in target order
    pub predictions: Vec<AdjustedPrediction>,
    /// Forecast details behind each prediction
    pub forecasts: Vec<MetricForecast>,
    /// Path of `predictions_<run_id>.csv`
    pub results_file: PathBuf,
    /// Chart outcome, kept apart from the numeric results
    pub visualizations: Result<VisualizationManifest>,
}

/// Output of a descriptive run over the input table
#[derive(Debug)]
pub struct DescribeReport {
    pub run_id: RunId,
    pub statistics_file: PathBuf,
    pub visualizations: VisualizationManifest,
}

/// Parse and validate an upload into a date-ordered series
pub fn load_series(bytes: &[u8], format: SourceFormat) -> Result<FinancialSeries> {
    let table = DataLoader::from_bytes(bytes, format)?;
    debug!(rows = table.len(), ?format, "loaded table");
    Validator::validate_table(&table)
}

/// Run the forecast and adjustment pipeline and persist its results
pub fn analyze(
    bytes: &[u8],
    format: SourceFormat,
    params: &UserParameters,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> Result<AnalysisReport> {
    let series = load_series(bytes, format)?;
    analyze_series(&series, params, config, clock)
}

/// Run the pipeline on an already validated series
pub fn analyze_series(
    series: &FinancialSeries,
    params: &UserParameters,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> Result<AnalysisReport> {
    let forecaster = Forecaster::from_config(config)?;
    let forecasts = forecaster.forecast_all(series, &config.targets)?;

    let predictions = ResultFormatter::new(clock).format_all(&forecasts, params)?;

    let run_id = RunId::new(clock, config.unique_run_ids);
    let writer = ReportWriter::from_config(config);
    let results_file = writer.write_predictions(&predictions, &run_id).map_err(|e| match e {
        ForecastError::IoError(err) => ForecastError::RenderError(format!(
            "cannot write results to {}: {}",
            writer.results_dir().display(),
            err
        )),
        other => other,
    })?;
    let visualizations = writer.render_prediction_charts(&predictions, &run_id);

    info!(
        run_id = %run_id,
        predictions = predictions.len(),
        results = %results_file.display(),
        charts_ok = visualizations.is_ok(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        run_id,
        predictions,
        forecasts,
        results_file,
        visualizations,
    })
}

/// Export descriptive statistics and exploratory charts of an upload
pub fn describe(
    bytes: &[u8],
    format: SourceFormat,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> Result<DescribeReport> {
    let series = load_series(bytes, format)?;
    describe_series(&series, config, clock)
}

/// Export descriptive statistics and exploratory charts of a validated series
pub fn describe_series(
    series: &FinancialSeries,
    config: &AnalysisConfig,
    clock: &dyn Clock,
) -> Result<DescribeReport> {
    let run_id = RunId::new(clock, config.unique_run_ids);
    let writer = ReportWriter::from_config(config);

    let statistics_file = writer.write_statistics(series, &run_id)?;
    let visualizations = writer.render_series_charts(series, &run_id)?;

    info!(run_id = %run_id, charts = visualizations.len(), "description complete");

    Ok(DescribeReport {
        run_id,
        statistics_file,
        visualizations,
    })
}
