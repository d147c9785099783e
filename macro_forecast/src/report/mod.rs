//! Persisting results: CSV exports and charts

mod charts;

use crate::clock::RunId;
use crate::config::AnalysisConfig;
use crate::data::FinancialSeries;
use crate::error::{ForecastError, Result};
use crate::formatting::AdjustedPrediction;
use charts::{ChangesChart, ComparisonChart, CorrelationChart, MetricPanels, TimeSeriesChart};
use econ_math::{describe, Summary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output format for rendered charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    Svg,
    Png,
}

impl Default for ChartFormat {
    /// PNG when raster output is compiled in, SVG otherwise
    fn default() -> Self {
        if cfg!(feature = "png") {
            ChartFormat::Png
        } else {
            ChartFormat::Svg
        }
    }
}

impl ChartFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// Chart name to written file, in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VisualizationManifest(BTreeMap<String, PathBuf>);

impl VisualizationManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, path: PathBuf) {
        self.0.insert(name.to_string(), path);
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.0.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Merge another manifest into this one
    pub fn extend(&mut self, other: VisualizationManifest) {
        self.0.extend(other.0);
    }
}

/// Writes prediction tables, statistics and charts for one run
#[derive(Debug, Clone)]
pub struct ReportWriter {
    results_dir: PathBuf,
    visualizations_dir: PathBuf,
    chart_format: ChartFormat,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        results_dir: P,
        visualizations_dir: Q,
        chart_format: ChartFormat,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            visualizations_dir: visualizations_dir.into(),
            chart_format,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.results_dir.clone(),
            config.visualizations_dir.clone(),
            config.chart_format,
        )
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn visualizations_dir(&self) -> &Path {
        &self.visualizations_dir
    }

    /// Write `predictions_<run_id>.csv` with one row per prediction
    pub fn write_predictions(
        &self,
        predictions: &[AdjustedPrediction],
        run_id: &RunId,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.results_dir)?;
        let path = self.results_dir.join(format!("predictions_{}.csv", run_id));

        let mut writer = csv::Writer::from_path(&path)?;
        if predictions.is_empty() {
            writer.write_record(["metric", "original", "adjusted", "change_percent", "timestamp"])?;
        }
        for prediction in predictions {
            writer.serialize(prediction)?;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = predictions.len(), "wrote predictions");
        Ok(path)
    }

    /// Write `statistics_<run_id>.csv`: one column per metric, one row per statistic
    pub fn write_statistics(&self, series: &FinancialSeries, run_id: &RunId) -> Result<PathBuf> {
        fs::create_dir_all(&self.visualizations_dir)?;
        let path = self
            .visualizations_dir
            .join(format!("statistics_{}.csv", run_id));

        let summaries = series
            .columns()
            .iter()
            .map(|column| describe(&column.values))
            .collect::<econ_math::Result<Vec<Summary>>>()?;

        let mut writer = csv::Writer::from_path(&path)?;
        let mut header = vec![String::new()];
        header.extend(series.column_names().iter().map(|name| name.to_string()));
        writer.write_record(&header)?;

        for (row, label) in Summary::LABELS.iter().enumerate() {
            let mut record = vec![label.to_string()];
            record.extend(summaries.iter().map(|s| s.values()[row].to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        debug!(path = %path.display(), "wrote statistics");
        Ok(path)
    }

    /// Render the `comparison` and `changes` charts of the predictions
    pub fn render_prediction_charts(
        &self,
        predictions: &[AdjustedPrediction],
        run_id: &RunId,
    ) -> Result<VisualizationManifest> {
        self.prepare_visualizations_dir()?;
        let mut manifest = VisualizationManifest::new();

        let path = self.chart_path("prediction_comparison", run_id);
        self.render_logged("comparison", &ComparisonChart(predictions), &path)?;
        manifest.insert("comparison", path);

        let path = self.chart_path("prediction_changes", run_id);
        self.render_logged("changes", &ChangesChart(predictions), &path)?;
        manifest.insert("changes", path);

        Ok(manifest)
    }

    /// Render the `timeseries`, `correlation` and `metrics` charts of the input
    pub fn render_series_charts(
        &self,
        series: &FinancialSeries,
        run_id: &RunId,
    ) -> Result<VisualizationManifest> {
        self.prepare_visualizations_dir()?;
        let mut manifest = VisualizationManifest::new();

        let path = self.chart_path("timeseries", run_id);
        self.render_logged("timeseries", &TimeSeriesChart(series), &path)?;
        manifest.insert("timeseries", path);

        let path = self.chart_path("correlation", run_id);
        self.render_logged("correlation", &CorrelationChart(series), &path)?;
        manifest.insert("correlation", path);

        let path = self.chart_path("metrics", run_id);
        self.render_logged("metrics", &MetricPanels(series), &path)?;
        manifest.insert("metrics", path);

        Ok(manifest)
    }

    fn chart_path(&self, stem: &str, run_id: &RunId) -> PathBuf {
        self.visualizations_dir
            .join(format!("{}_{}.{}", stem, run_id, self.chart_format.extension()))
    }

    fn prepare_visualizations_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.visualizations_dir).map_err(|e| {
            ForecastError::RenderError(format!(
                "cannot create {}: {}",
                self.visualizations_dir.display(),
                e
            ))
        })
    }

    fn render_logged<C: charts::Chart>(&self, name: &str, chart: &C, path: &Path) -> Result<()> {
        match charts::render(chart, path, self.chart_format) {
            Ok(()) => {
                debug!(chart = name, path = %path.display(), "rendered chart");
                Ok(())
            }
            Err(error) => {
                warn!(chart = name, %error, "chart rendering failed");
                Err(match error {
                    ForecastError::RenderError(_) => error,
                    other => ForecastError::RenderError(other.to_string()),
                })
            }
        }
    }
}
