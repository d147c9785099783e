//! Macroeconomic adjustment of forecasts
//!
//! Rates are given in percent; the growth factor is a plain multiplier.

use crate::error::{ForecastError, Result};
use crate::schema::{CASH_FLOW, PROFIT_MARGIN, REVENUE_GROWTH};
use crate::validation::UserParameters;

/// Multiplier applied to a metric's forecast
pub fn adjustment_factor(metric: &str, params: &UserParameters) -> f64 {
    let inflation = params.inflation_rate() / 100.0;
    let interest = params.interest_rate() / 100.0;
    let growth = params.growth_factor();

    match metric {
        // revenue rides growth, eroded by inflation
        REVENUE_GROWTH => 1.0 + growth - inflation,
        PROFIT_MARGIN => 1.0 - inflation - interest,
        CASH_FLOW => 1.0 + growth - (inflation + interest) / 2.0,
        _ => 1.0,
    }
}

/// Adjust a forecast value for the given assumptions
pub fn adjust(metric: &str, original: f64, params: &UserParameters) -> Result<f64> {
    if !original.is_finite() {
        return Err(ForecastError::InternalError(format!(
            "Cannot adjust non-finite forecast {} for {}",
            original, metric
        )));
    }

    Ok(original * adjustment_factor(metric, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unknown_metric_is_identity() {
        let params = UserParameters::new(5.0, 3.0, 1.5).unwrap();
        assert_relative_eq!(adjust("Headcount", 42.0, &params).unwrap(), 42.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let params = UserParameters::default();
        assert!(adjust(REVENUE_GROWTH, f64::NAN, &params).is_err());
        assert!(adjust(CASH_FLOW, f64::INFINITY, &params).is_err());
    }
}
