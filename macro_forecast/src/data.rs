//! Loading uploaded financial tables
//!
//! Delimited text is parsed with polars; documents go through
//! [`crate::document`] table extraction. Either way the result is a
//! [`LoadedTable`]: the raw frame plus its parsed, sorted `Date` index.

use crate::document;
use crate::error::{ForecastError, Result};
use crate::schema::{missing_columns, DATE_COLUMN};
use crate::utils::date_parser::parse_date;
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Kind of uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma separated table with a header row
    DelimitedText,
    /// Paginated document whose first table holds the data
    Document,
}

impl SourceFormat {
    /// Detect the format from a declared content type
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let lower = content_type.to_lowercase();
        if lower.contains("csv") {
            Ok(SourceFormat::DelimitedText)
        } else if lower.contains("pdf") {
            Ok(SourceFormat::Document)
        } else {
            Err(ForecastError::UnsupportedFormat(format!(
                "content type '{}' is not supported, use CSV or PDF",
                content_type
            )))
        }
    }

    /// Detect the format from a file name extension
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(SourceFormat::DelimitedText),
            Some("pdf") => Ok(SourceFormat::Document),
            _ => Err(ForecastError::UnsupportedFormat(format!(
                "file '{}' is not supported, use CSV or PDF",
                filename
            ))),
        }
    }
}

/// A parsed table whose `Date` column has been validated and sorted
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Frame as parsed, in upload row order
    df: DataFrame,
    /// Parsed dates in ascending order
    dates: Vec<NaiveDateTime>,
    /// Upload row index of each sorted position
    row_order: Vec<usize>,
}

impl LoadedTable {
    /// Get the DataFrame in upload row order
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Sorted dates
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// Upload row index for each sorted position
    pub fn row_order(&self) -> &[usize] {
        &self.row_order
    }

    /// Names of every column other than `Date`
    pub fn value_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .filter(|name| *name != DATE_COLUMN)
            .map(|name| name.to_string())
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Data loader for uploaded financial tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a table from raw upload bytes
    pub fn from_bytes(bytes: &[u8], format: SourceFormat) -> Result<LoadedTable> {
        let df = match format {
            SourceFormat::DelimitedText => Self::parse_delimited(bytes)?,
            SourceFormat::Document => document::extract_first_table(bytes)?,
        };
        debug!(rows = df.height(), columns = df.width(), ?format, "parsed upload");

        Self::from_dataframe(df)
    }

    /// Load a table from a file, detecting the format from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LoadedTable> {
        let path = path.as_ref();
        let format = SourceFormat::from_filename(&path.to_string_lossy())?;
        let bytes = std::fs::read(path)?;

        Self::from_bytes(&bytes, format)
    }

    /// Check the schema of an existing DataFrame and index it by date
    pub fn from_dataframe(df: DataFrame) -> Result<LoadedTable> {
        let missing = missing_columns(&df.get_column_names());
        if !missing.is_empty() {
            return Err(ForecastError::MissingColumns(missing));
        }

        let parsed = Self::parse_dates(&df)?;

        let mut row_order: Vec<usize> = (0..parsed.len()).collect();
        row_order.sort_by_key(|&row| parsed[row]);
        let dates: Vec<NaiveDateTime> = row_order.iter().map(|&row| parsed[row]).collect();

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ForecastError::InvalidData(format!(
                "Duplicate date {} in {} column",
                pair[0], DATE_COLUMN
            )));
        }

        Ok(LoadedTable {
            df,
            dates,
            row_order,
        })
    }

    fn parse_delimited(bytes: &[u8]) -> Result<DataFrame> {
        CsvReader::new(Cursor::new(bytes.to_vec()))
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| ForecastError::InvalidData(format!("Could not parse table: {}", e)))
    }

    fn parse_dates(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
        let column = df.column(DATE_COLUMN)?.cast(&DataType::Utf8)?;
        let cells = column.utf8()?;

        cells
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let text = cell.ok_or_else(|| {
                    ForecastError::InvalidData(format!("Missing {} at row {}", DATE_COLUMN, row + 1))
                })?;
                parse_date(text).ok_or_else(|| {
                    ForecastError::InvalidData(format!(
                        "Unparseable {} '{}' at row {}",
                        DATE_COLUMN,
                        text,
                        row + 1
                    ))
                })
            })
            .collect()
    }
}

/// One numeric column of a validated series
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    /// Column name
    pub name: String,
    /// Values in date order
    pub values: Vec<f64>,
}

/// Validated, date-ordered financial dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSeries {
    /// Strictly increasing dates
    dates: Vec<NaiveDateTime>,
    /// Numeric columns, in upload column order
    columns: Vec<MetricColumn>,
}

impl FinancialSeries {
    /// Create a series, checking its invariants
    pub fn new(dates: Vec<NaiveDateTime>, columns: Vec<MetricColumn>) -> Result<Self> {
        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(ForecastError::InvalidData(format!(
                "Dates must be strictly increasing ({} followed by {})",
                pair[0], pair[1]
            )));
        }

        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(ForecastError::InvalidData(format!(
                    "Column '{}' has {} values for {} dates",
                    column.name,
                    column.values.len(),
                    dates.len()
                )));
            }
            if column.values.iter().any(|v| !v.is_finite()) {
                return Err(ForecastError::InvalidData(format!(
                    "Column '{}' contains non-finite values",
                    column.name
                )));
            }
        }

        Ok(Self { dates, columns })
    }

    /// Dates in ascending order
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// All numeric columns
    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    /// Names of the numeric columns
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of a named column in date order
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| ForecastError::MissingColumns(vec![name.to_string()]))
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series has no observations
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
