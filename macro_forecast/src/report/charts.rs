//! Chart drawing
//!
//! Every chart draws onto a generic plotters backend so the same code renders
//! SVG and, with the `png` feature, bitmap output.

use super::ChartFormat;
use crate::data::FinancialSeries;
use crate::error::{ForecastError, Result};
use crate::formatting::AdjustedPrediction;
use econ_math::{correlation_matrix, LinearRegression};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt;
use std::path::Path;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
const WARM: RGBColor = RGBColor(180, 4, 38);
const COOL: RGBColor = RGBColor(59, 76, 192);
const BAR_WIDTH: f64 = 0.35;
const PANEL_COLUMNS: usize = 3;

/// Something that can be drawn onto a drawing area
pub(crate) trait Chart {
    /// Pixel size of the rendered chart
    fn size(&self) -> (u32, u32);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Render a chart to `path` in the requested format
pub(crate) fn render<C: Chart>(chart: &C, path: &Path, format: ChartFormat) -> Result<()> {
    match format {
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, chart.size()).into_drawing_area();
            chart.draw(&root)?;
            root.present().map_err(render_error)
        }
        #[cfg(feature = "png")]
        ChartFormat::Png => {
            let root = BitMapBackend::new(path, chart.size()).into_drawing_area();
            chart.draw(&root)?;
            root.present().map_err(render_error)
        }
        #[cfg(not(feature = "png"))]
        ChartFormat::Png => Err(ForecastError::RenderError(
            "PNG output requires the `png` feature".to_string(),
        )),
    }
}

fn render_error<E: fmt::Display>(err: E) -> ForecastError {
    ForecastError::RenderError(err.to_string())
}

/// Value range covering `values` and zero, padded on both sides
fn padded_bounds<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - span * 0.1, hi + span * 0.1)
}

/// Tight value range of `values`, padded on both sides
fn data_bounds<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - span * 0.05, hi + span * 0.05)
}

/// Label for a category axis whose categories sit on integer positions
fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Index axis covering `len` observations
fn index_range(len: usize) -> std::ops::Range<f64> {
    if len < 2 {
        -0.5..0.5
    } else {
        0.0..(len - 1) as f64
    }
}

/// Grouped bars of original vs adjusted predictions
pub(crate) struct ComparisonChart<'a>(pub &'a [AdjustedPrediction]);

impl Chart for ComparisonChart<'_> {
    fn size(&self) -> (u32, u32) {
        (1200, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let predictions = self.0;
        let names: Vec<String> = predictions.iter().map(|p| p.metric.clone()).collect();
        let n = predictions.len().max(1) as f64;
        let (lo, hi) = padded_bounds(predictions.iter().flat_map(|p| [p.original, p.adjusted]));

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption("Original vs Adjusted Predictions", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..n - 0.5, lo..hi)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len())
            .x_label_formatter(&|x| category_label(&names, *x))
            .x_desc("Metrics")
            .y_desc("Values")
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(predictions.iter().enumerate().map(|(i, p)| {
                let x = i as f64;
                Rectangle::new([(x - BAR_WIDTH, 0.0), (x, p.original)], SKY_BLUE.filled())
            }))
            .map_err(render_error)?
            .label("Original")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], SKY_BLUE.filled()));

        chart
            .draw_series(predictions.iter().enumerate().map(|(i, p)| {
                let x = i as f64;
                Rectangle::new([(x, 0.0), (x + BAR_WIDTH, p.adjusted)], LIGHT_CORAL.filled())
            }))
            .map_err(render_error)?
            .label("Adjusted")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], LIGHT_CORAL.filled()));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }
}

/// Bars of percent change, annotated with their values
pub(crate) struct ChangesChart<'a>(pub &'a [AdjustedPrediction]);

impl Chart for ChangesChart<'_> {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let predictions = self.0;
        let names: Vec<String> = predictions.iter().map(|p| p.metric.clone()).collect();
        let n = predictions.len().max(1) as f64;
        let (lo, hi) = padded_bounds(predictions.iter().map(|p| p.change_percent));

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption("Prediction Changes After Adjustment", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..n - 0.5, lo..hi)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len())
            .x_label_formatter(&|x| category_label(&names, *x))
            .x_desc("Metrics")
            .y_desc("Change (%)")
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(predictions.iter().enumerate().map(|(i, p)| {
                let x = i as f64;
                let color = if p.change_percent >= 0.0 { GREEN } else { RED };
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, p.change_percent)], color.filled())
            }))
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(
                vec![(-0.5, 0.0), (n - 0.5, 0.0)],
                BLACK.mix(0.2).stroke_width(1),
            ))
            .map_err(render_error)?;

        // label sits above positive bars and below negative ones
        chart
            .draw_series(predictions.iter().enumerate().map(|(i, p)| {
                let vpos = if p.change_percent >= 0.0 { VPos::Bottom } else { VPos::Top };
                let style = TextStyle::from(("sans-serif", 14).into_font())
                    .pos(Pos::new(HPos::Center, vpos));
                Text::new(
                    format!("{:.1}%", p.change_percent),
                    (i as f64, p.change_percent),
                    style,
                )
            }))
            .map_err(render_error)?;

        Ok(())
    }
}

/// Every numeric column plotted against its dates
pub(crate) struct TimeSeriesChart<'a>(pub &'a FinancialSeries);

impl Chart for TimeSeriesChart<'_> {
    fn size(&self) -> (u32, u32) {
        (1500, 1000)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let series = self.0;
        let dates = series.dates();
        let (lo, hi) = data_bounds(series.columns().iter().flat_map(|c| c.values.iter().copied()));

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption("Financial Metrics Over Time", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(index_range(series.len()), lo..hi)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .light_line_style(&BLACK.mix(0.05))
            .x_labels(dates.len().min(12))
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                dates
                    .get(idx as usize)
                    .map(|d| d.format("%Y-%m").to_string())
                    .unwrap_or_default()
            })
            .x_desc("Date")
            .y_desc("Value")
            .draw()
            .map_err(render_error)?;

        for (i, column) in series.columns().iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let points: Vec<(f64, f64)> = column
                .values
                .iter()
                .enumerate()
                .map(|(x, &y)| (x as f64, y))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(render_error)?
                .label(column.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
                .map_err(render_error)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }
}

/// Pairwise correlation heatmap of the numeric columns
pub(crate) struct CorrelationChart<'a>(pub &'a FinancialSeries);

impl Chart for CorrelationChart<'_> {
    fn size(&self) -> (u32, u32) {
        (1000, 800)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let series = self.0;
        let names: Vec<String> = series.column_names().iter().map(|s| s.to_string()).collect();
        let columns: Vec<&[f64]> = series.columns().iter().map(|c| c.values.as_slice()).collect();
        let matrix = correlation_matrix(&columns)?;
        let n = names.len();
        let reversed: Vec<String> = names.iter().rev().cloned().collect();
        let extent = n.max(1) as f64 - 0.5;

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption("Correlation Between Metrics", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(140)
            .build_cartesian_2d(-0.5..extent, -0.5..extent)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| category_label(&names, *x))
            .y_label_formatter(&|y| category_label(&reversed, *y))
            .draw()
            .map_err(render_error)?;

        let cells = lower_triangle_cells(&matrix);

        chart
            .draw_series(cells.iter().map(|&(x, y, r)| {
                Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    correlation_color(r).filled(),
                )
            }))
            .map_err(render_error)?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        chart
            .draw_series(cells.iter().map(|&(x, y, r)| {
                let label = if r.is_finite() { format!("{:.2}", r) } else { "n/a".to_string() };
                Text::new(
                    label,
                    (x, y),
                    TextStyle::from(("sans-serif", 16).into_font()).pos(centered),
                )
            }))
            .map_err(render_error)?;

        Ok(())
    }
}

/// Plot positions of the cells strictly below the diagonal, first row on top.
/// The diagonal and upper triangle mirror them and stay blank.
fn lower_triangle_cells(matrix: &[Vec<f64>]) -> Vec<(f64, f64, f64)> {
    let n = matrix.len();
    matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .take(i)
                .enumerate()
                .map(move |(j, &r)| (j as f64, (n - 1 - i) as f64, r))
        })
        .collect()
}

/// Diverging color for a correlation coefficient
fn correlation_color(r: f64) -> RGBColor {
    if !r.is_finite() {
        return RGBColor(200, 200, 200);
    }
    let target = if r >= 0.0 { WARM } else { COOL };
    let t = r.abs().min(1.0);
    let blend = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    RGBColor(blend(255, target.0), blend(255, target.1), blend(255, target.2))
}

/// One panel per metric with its linear trend
pub(crate) struct MetricPanels<'a>(pub &'a FinancialSeries);

impl Chart for MetricPanels<'_> {
    fn size(&self) -> (u32, u32) {
        (1500, 1000)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let series = self.0;
        let columns = series.columns();
        let rows = columns.len().div_ceil(PANEL_COLUMNS).max(1);

        root.fill(&WHITE).map_err(render_error)?;
        let panels = root.split_evenly((rows, PANEL_COLUMNS));

        for (column, panel) in columns.iter().zip(panels.iter()) {
            // a single observation has no trend
            let fitted = if column.values.len() < 2 {
                Vec::new()
            } else {
                LinearRegression::new()
                    .fit(&column.values)?
                    .fitted(column.values.len())
            };
            let (lo, hi) = data_bounds(column.values.iter().chain(fitted.iter()).copied());

            let mut chart = ChartBuilder::on(panel)
                .caption(format!("{} Over Time", column.name), ("sans-serif", 18))
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(60)
                .build_cartesian_2d(index_range(column.values.len()), lo..hi)
                .map_err(render_error)?;

            chart
                .configure_mesh()
                .light_line_style(&BLACK.mix(0.05))
                .x_labels(4)
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(LineSeries::new(
                    column.values.iter().enumerate().map(|(x, &y)| (x as f64, y)),
                    BLUE.stroke_width(2),
                ))
                .map_err(render_error)?;

            chart
                .draw_series(LineSeries::new(
                    fitted.iter().enumerate().map(|(x, &y)| (x as f64, y)),
                    RED.mix(0.8).stroke_width(1),
                ))
                .map_err(render_error)?;
        }

        Ok(())
    }
}
