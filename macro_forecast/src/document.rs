//! Table extraction from paginated documents
//!
//! Text is pulled from every page and scanned for whitespace aligned tables:
//! a header line of labels followed by rows with the same number of fields.
//! Only the first table found is used.

use crate::error::{ForecastError, Result};
use polars::prelude::*;

/// A table recovered from document text, all cells as strings
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Convert into a DataFrame of string columns
    pub fn into_dataframe(self) -> Result<DataFrame> {
        let columns: Vec<Series> = self
            .header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<String> = self.rows.iter().map(|row| row[idx].clone()).collect();
                Series::new(name, cells)
            })
            .collect();

        DataFrame::new(columns)
            .map_err(|e| ForecastError::InvalidData(format!("Malformed document table: {}", e)))
    }
}

/// Extract the first table from a PDF document
#[cfg(feature = "pdf")]
pub fn extract_first_table(bytes: &[u8]) -> Result<DataFrame> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ForecastError::InvalidData(format!("Could not read document: {}", e)))?;

    first_table(&text)
        .ok_or_else(|| ForecastError::InvalidData("No tables found in document".to_string()))?
        .into_dataframe()
}

/// Extract the first table from a PDF document
#[cfg(not(feature = "pdf"))]
pub fn extract_first_table(_bytes: &[u8]) -> Result<DataFrame> {
    Err(ForecastError::UnsupportedFormat(
        "document uploads need the `pdf` feature".to_string(),
    ))
}

/// First table in extracted document text, if any
pub fn first_table(text: &str) -> Option<TextTable> {
    find_tables(text).into_iter().next()
}

/// All tables in extracted document text, in page order
pub fn find_tables(text: &str) -> Vec<TextTable> {
    let lines: Vec<Vec<String>> = text.lines().map(split_fields).collect();
    let mut tables = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let header = &lines[idx];
        if !is_header(header) {
            idx += 1;
            continue;
        }

        let rows: Vec<Vec<String>> = lines[idx + 1..]
            .iter()
            .take_while(|row| row.len() == header.len() && !is_header(row))
            .cloned()
            .collect();

        if rows.iter().any(|row| row.iter().any(|cell| looks_numeric(cell))) {
            idx += rows.len() + 1;
            tables.push(TextTable {
                header: header.clone(),
                rows,
            });
        } else {
            idx += 1;
        }
    }

    tables
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == '|')
        .map(|field| field.trim_matches(','))
        .filter(|field| !field.is_empty())
        .map(|field| field.to_string())
        .collect()
}

fn is_header(fields: &[String]) -> bool {
    fields.len() >= 2 && fields.iter().all(|f| !looks_numeric(f) && !starts_with_digit(f))
}

fn looks_numeric(field: &str) -> bool {
    field.replace(',', "").parse::<f64>().is_ok()
}

fn starts_with_digit(field: &str) -> bool {
    field.chars().next().map_or(false, |c| c.is_ascii_digit())
}
