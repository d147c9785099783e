mod common;

use approx::assert_relative_eq;
use common::{config_in, frozen_clock, frozen_instant, monthly_csv};
use macro_forecast::pipeline::load_series;
use macro_forecast::{
    AdjustedPrediction, AnalysisConfig, ChartFormat, ForecastError, ReportWriter,
    ResultFormatter, RunId, SourceFormat,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn sample_predictions() -> Vec<AdjustedPrediction> {
    let clock = frozen_clock();
    let formatter = ResultFormatter::new(&clock);
    vec![
        formatter.format("Revenue_Growth", 7.25, 14.5).unwrap(),
        formatter.format("Profit_Margin", 13.0, 12.61).unwrap(),
        formatter.format("Cash_Flow", 1300.0, 2600.0).unwrap(),
    ]
}

#[test]
fn test_predictions_csv_layout() {
    let dir = tempdir().unwrap();
    let writer = ReportWriter::new(
        dir.path().join("nested/results"),
        dir.path().join("viz"),
        ChartFormat::Svg,
    );
    let run_id = RunId::from_time(frozen_instant());

    let path = writer.write_predictions(&sample_predictions(), &run_id).unwrap();

    assert_eq!(path.file_name().unwrap(), "predictions_20240315_143000.csv");
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "metric,original,adjusted,change_percent,timestamp");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Revenue_Growth,7.25,14.5,100.0,2024-03-15 14:30:00"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let records: Vec<AdjustedPrediction> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(records, sample_predictions());
}

#[test]
fn test_statistics_export_matches_hand_computation() {
    let csv = "Date,Inflation_Rate,Interest_Rate,Revenue_Growth,Profit_Margin,Cash_Flow\n\
        2023-01-01,1,10,5,12,100\n\
        2023-02-01,2,10,6,12,200\n\
        2023-03-01,3,10,7,12,300\n\
        2023-04-01,4,10,8,12,400\n\
        2023-05-01,5,10,9,12,500\n";
    let series = load_series(csv.as_bytes(), SourceFormat::DelimitedText).unwrap();

    let dir = tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().join("results"), dir.path().join("viz"), ChartFormat::Svg);
    let path = writer
        .write_statistics(&series, &RunId::from_time(frozen_instant()))
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "statistics_20240315_143000.csv");

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        header,
        vec!["", "Inflation_Rate", "Interest_Rate", "Revenue_Growth", "Profit_Margin", "Cash_Flow"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let labels: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(labels, vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);

    let inflation: Vec<f64> = rows.iter().map(|r| r[1].parse().unwrap()).collect();
    let expected = [5.0, 3.0, 2.5f64.sqrt(), 1.0, 2.0, 3.0, 4.0, 5.0];
    for (actual, expected) in inflation.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-12);
    }

    // constant column has zero spread
    let interest_std: f64 = rows[2][2].parse().unwrap();
    assert_eq!(interest_std, 0.0);
}

#[test]
fn test_prediction_charts_are_written() {
    let dir = tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().join("results"), dir.path().join("viz"), ChartFormat::Svg);
    let run_id = RunId::from_time(frozen_instant());

    let manifest = writer
        .render_prediction_charts(&sample_predictions(), &run_id)
        .unwrap();

    assert_eq!(manifest.len(), 2);
    let comparison = manifest.get("comparison").unwrap();
    let changes = manifest.get("changes").unwrap();
    assert_eq!(
        comparison.file_name().unwrap(),
        "prediction_comparison_20240315_143000.svg"
    );
    assert_eq!(changes.file_name().unwrap(), "prediction_changes_20240315_143000.svg");

    let svg = fs::read_to_string(changes).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("100.0%"));
}

#[test]
fn test_series_charts_are_written() {
    let series = load_series(monthly_csv(24).as_bytes(), SourceFormat::DelimitedText).unwrap();
    let dir = tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().join("results"), dir.path().join("viz"), ChartFormat::Svg);

    let manifest = writer
        .render_series_charts(&series, &RunId::from_time(frozen_instant()))
        .unwrap();

    let names: Vec<&str> = manifest.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["correlation", "metrics", "timeseries"]);
    for (_, path) in manifest.iter() {
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[test]
fn test_unwritable_directory_is_render_error() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("viz");
    fs::write(&blocker, "not a directory").unwrap();

    let writer = ReportWriter::new(dir.path().join("results"), &blocker, ChartFormat::Svg);
    let err = writer
        .render_prediction_charts(&sample_predictions(), &RunId::from_time(frozen_instant()))
        .unwrap_err();

    assert!(matches!(err, ForecastError::RenderError(_)));
    assert_eq!(err.status_code(), 500);
}

#[cfg(not(feature = "png"))]
#[test]
fn test_png_needs_feature() {
    let dir = tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().join("results"), dir.path().join("viz"), ChartFormat::Png);
    let err = writer
        .render_prediction_charts(&sample_predictions(), &RunId::from_time(frozen_instant()))
        .unwrap_err();
    assert!(matches!(err, ForecastError::RenderError(_)));
}

#[cfg(feature = "png")]
#[test]
fn test_default_charts_are_png() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    assert_eq!(config.chart_format, ChartFormat::Png);

    let writer = ReportWriter::from_config(&config);
    let manifest = writer
        .render_prediction_charts(&sample_predictions(), &RunId::from_time(frozen_instant()))
        .unwrap();

    let comparison = manifest.get("comparison").unwrap();
    assert_eq!(
        comparison.file_name().unwrap(),
        "prediction_comparison_20240315_143000.png"
    );
    let bytes = fs::read(comparison).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert!(manifest.get("changes").unwrap().exists());
}

#[test]
fn test_svg_from_config() {
    let config = AnalysisConfig::from_toml_str("chart_format = \"svg\"").unwrap();
    assert_eq!(config.chart_format, ChartFormat::Svg);
}

#[test]
fn test_chart_format_extension() {
    let expected = if cfg!(feature = "png") { ChartFormat::Png } else { ChartFormat::Svg };
    assert_eq!(ChartFormat::default(), expected);
    assert_eq!(ChartFormat::Svg.extension(), "svg");
    assert_eq!(ChartFormat::Png.extension(), "png");
}
