//! Schema and parameter validation

use crate::data::{FinancialSeries, LoadedTable, MetricColumn};
use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::Serialize;

/// Validator for loaded tables
#[derive(Debug)]
pub struct Validator;

impl Validator {
    /// Coerce every non-date column to numbers and reject missing values
    pub fn validate_table(table: &LoadedTable) -> Result<FinancialSeries> {
        if table.is_empty() {
            return Err(ForecastError::InvalidData("Empty dataset".to_string()));
        }

        let mut columns = Vec::new();
        let mut incomplete = Vec::new();

        for name in table.value_columns() {
            let coerced = table.dataframe().column(&name)?.cast(&DataType::Float64)?;
            let cells: Vec<Option<f64>> = coerced.f64()?.into_iter().collect();

            // unparseable cells became nulls during the cast
            let values: Option<Vec<f64>> = table
                .row_order()
                .iter()
                .map(|&row| cells[row].filter(|v| v.is_finite()))
                .collect();

            match values {
                Some(values) => columns.push(MetricColumn { name, values }),
                None => incomplete.push(name),
            }
        }

        if !incomplete.is_empty() {
            return Err(ForecastError::InvalidData(format!(
                "Dataset contains missing values in: {}",
                incomplete.join(", ")
            )));
        }

        FinancialSeries::new(table.dates().to_vec(), columns)
    }
}

/// Macroeconomic assumptions supplied with a request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserParameters {
    inflation_rate: f64,
    interest_rate: f64,
    growth_factor: f64,
}

impl Default for UserParameters {
    fn default() -> Self {
        Self {
            inflation_rate: 0.0,
            interest_rate: 0.0,
            growth_factor: 1.0,
        }
    }
}

impl UserParameters {
    /// Create validated parameters
    pub fn new(inflation_rate: f64, interest_rate: f64, growth_factor: f64) -> Result<Self> {
        for (field, value) in [
            ("inflation_rate", inflation_rate),
            ("interest_rate", interest_rate),
            ("growth_factor", growth_factor),
        ] {
            if !value.is_finite() {
                return Err(ForecastError::InvalidParameters(format!(
                    "{} must be a finite number",
                    field
                )));
            }
        }

        if !(0.0..=2.0).contains(&growth_factor) {
            return Err(ForecastError::ParameterOutOfRange {
                field: "growth_factor".to_string(),
                reason: "must be between 0 and 2".to_string(),
            });
        }
        if inflation_rate < 0.0 {
            return Err(ForecastError::ParameterOutOfRange {
                field: "inflation_rate".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }
        if interest_rate < 0.0 {
            return Err(ForecastError::ParameterOutOfRange {
                field: "interest_rate".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        Ok(Self {
            inflation_rate,
            interest_rate,
            growth_factor,
        })
    }

    /// Parse raw form values; absent fields take the defaults `0, 0, 1`
    pub fn parse(
        inflation_rate: Option<&str>,
        interest_rate: Option<&str>,
        growth_factor: Option<&str>,
    ) -> Result<Self> {
        let defaults = Self::default();

        Self::new(
            parse_field("inflation_rate", inflation_rate, defaults.inflation_rate)?,
            parse_field("interest_rate", interest_rate, defaults.interest_rate)?,
            parse_field("growth_factor", growth_factor, defaults.growth_factor)?,
        )
    }

    /// Inflation rate in percent
    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    /// Interest rate in percent
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Growth multiplier within `[0, 2]`
    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }
}

fn parse_field(field: &str, raw: Option<&str>, default: f64) -> Result<f64> {
    match raw {
        None => Ok(default),
        Some(text) => text.trim().parse::<f64>().map_err(|_| {
            ForecastError::InvalidParameters(format!("{} '{}' is not a number", field, text))
        }),
    }
}
