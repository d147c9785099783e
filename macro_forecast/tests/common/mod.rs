#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use macro_forecast::{AnalysisConfig, FixedClock};
use std::path::Path;

pub const HEADER: &str = "Date,Inflation_Rate,Interest_Rate,Revenue_Growth,Profit_Margin,Cash_Flow";

/// One CSV data line for month `i` of a smooth synthetic dataset
pub fn monthly_row(i: usize) -> String {
    let t = i as f64;
    format!(
        "{:04}-{:02}-01,{:.4},{:.4},{:.4},{:.4},{:.4}",
        2022 + i / 12,
        i % 12 + 1,
        2.0 + 0.05 * t + 0.1 * t.sin(),
        3.0 + 0.02 * t,
        5.0 + 0.1 * t + 0.3 * t.sin(),
        12.0 + 0.05 * t + 0.2 * t.cos(),
        1000.0 + 15.0 * t + 8.0 * (0.7 * t).sin(),
    )
}

/// Monthly dataset with all six required columns, in date order
pub fn monthly_csv(rows: usize) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for i in 0..rows {
        text.push_str(&monthly_row(i));
        text.push('\n');
    }
    text
}

/// Configuration writing every output under `root`
pub fn config_in(root: &Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.results_dir = root.join("results");
    config.visualizations_dir = root.join("visualizations");
    config.service.uploads_dir = root.join("uploads");
    config
}

pub fn frozen_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

pub fn frozen_clock() -> FixedClock {
    FixedClock(frozen_instant())
}

/// One-page PDF showing the monthly dataset as a space separated table.
/// Each line is its own text object, 20pt below the previous one.
pub fn monthly_pdf(rows: usize) -> Vec<u8> {
    let mut content = String::new();
    for (line_no, line) in monthly_csv(rows).lines().enumerate() {
        content.push_str(&format!(
            "BT /F1 1 Tf 8 0 0 8 40 {} Tm ({}) Tj ET\n",
            760 - 20 * line_no,
            line.replace(',', " ")
        ));
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", idx + 1, body));
    }

    let xref = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    ));
    pdf.into_bytes()
}
