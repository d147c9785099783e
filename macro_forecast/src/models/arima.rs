//! ARIMA models for time series forecasting
//!
//! The series is differenced `d` times, centred on its mean (the drift), and
//! an ARMA(p, q) is fitted to it by conditional sum of squares. The objective
//! is minimised with Nelder-Mead; parameters outside the stationary and
//! invertible region are penalised.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use argmin::core::{CostFunction, Error as ArgminError, Executor, State};
use argmin::solver::neldermead::NelderMead;
use econ_math::{difference, undifference};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

const MAX_AR_ORDER: usize = 5;
const MAX_DIFFERENCING: usize = 2;
const MAX_MA_ORDER: usize = 5;

/// Orders of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    /// Estimate a mean for the differenced series
    with_drift: bool,
    /// Nelder-Mead iteration budget
    max_iters: u64,
    /// Coverage of the forecast intervals
    confidence_level: f64,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    order: ArimaOrder,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series
    drift: f64,
    /// Residual variance
    sigma2: f64,
    /// Centred differenced training series
    centered: Vec<f64>,
    /// In-sample residuals
    residuals: Vec<f64>,
    /// Last value of each differencing level
    anchors: Vec<f64>,
    confidence_level: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Result<Self> {
        if order.p > MAX_AR_ORDER || order.d > MAX_DIFFERENCING || order.q > MAX_MA_ORDER {
            return Err(ForecastError::InternalError(format!(
                "{} is outside the supported orders (p <= {}, d <= {}, q <= {})",
                order, MAX_AR_ORDER, MAX_DIFFERENCING, MAX_MA_ORDER
            )));
        }

        Ok(Self {
            name: order.to_string(),
            order,
            with_drift: true,
            max_iters: 1000,
            confidence_level: 0.95,
        })
    }

    /// Enable or disable the drift term
    pub fn with_drift(mut self, with_drift: bool) -> Self {
        self.with_drift = with_drift;
        self
    }

    /// Set the optimiser iteration budget
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fewest training observations the order can be fitted on
    pub fn min_observations(&self) -> usize {
        self.order.p + self.order.d + self.order.q + 1
    }

    fn fit_coefficients(&self, objective: &CssObjective) -> Result<Vec<f64>> {
        let k = self.order.p + self.order.q;
        if k == 0 {
            return Ok(Vec::new());
        }

        let start = vec![0.1; k];
        let mut simplex = vec![start.clone()];
        for i in 0..k {
            let mut vertex = start.clone();
            vertex[i] += 0.2;
            simplex.push(vertex);
        }

        let not_converged =
            |e: ArgminError| ForecastError::InsufficientData(format!("{} failed to converge: {}", self.name, e));

        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(1e-10)
            .map_err(not_converged)?;
        let result = Executor::new(objective.clone(), solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .map_err(not_converged)?;

        let state = result.state();
        let params = state.get_best_param().cloned().ok_or_else(|| {
            ForecastError::InsufficientData(format!("{} produced no estimate", self.name))
        })?;

        if !state.get_best_cost().is_finite()
            || params.iter().any(|v| !v.is_finite())
            || !objective.admissible(&params)
        {
            return Err(ForecastError::InsufficientData(format!(
                "{} failed to converge to a stationary, invertible fit",
                self.name
            )));
        }

        Ok(params)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &[f64]) -> Result<TrainedArimaModel> {
        let ArimaOrder { p, d, q } = self.order;
        if data.len() < self.min_observations() {
            return Err(ForecastError::InsufficientData(format!(
                "Insufficient data for {}. Need at least {} observations, got {}.",
                self.name,
                self.min_observations(),
                data.len()
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(
                "Series contains non-finite values".to_string(),
            ));
        }

        let differenced = difference(data, d)?;
        let drift = if self.with_drift {
            econ_math::mean(&differenced.values)?
        } else {
            0.0
        };
        let centered: Vec<f64> = differenced.values.iter().map(|w| w - drift).collect();

        let objective = CssObjective {
            series: centered.clone(),
            p,
            q,
        };
        let params = self.fit_coefficients(&objective)?;
        let residuals = objective.residuals(&params);

        let effective = (centered.len() - p) as f64;
        let sigma2 = residuals[p..].iter().map(|e| e * e).sum::<f64>() / effective;

        let (ar, ma) = params.split_at(p);

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients: ar.to_vec(),
            ma_coefficients: ma.to_vec(),
            drift,
            sigma2,
            centered,
            residuals,
            anchors: differenced.anchors,
            confidence_level: self.confidence_level,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Fitted AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Fitted MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Mean change per period of the differenced series
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Residual variance of the fit
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Forecast the differenced, centred series with future shocks at zero
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let mut history = self.centered.clone();
        let mut shocks = self.residuals.clone();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let ar: f64 = self
                .ar_coefficients
                .iter()
                .enumerate()
                .map(|(i, phi)| phi * history[history.len() - 1 - i])
                .sum();
            let ma: f64 = self
                .ma_coefficients
                .iter()
                .enumerate()
                .filter(|(j, _)| *j < shocks.len())
                .map(|(j, theta)| theta * shocks[shocks.len() - 1 - j])
                .sum();

            let forecast = ar + ma;
            history.push(forecast);
            shocks.push(0.0);
            forecasts.push(forecast + self.drift);
        }

        forecasts
    }

    /// Psi weights of the integrated model, `psi[0] == 1`
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // AR polynomial multiplied by (1 - B)^d
        let mut poly = vec![1.0];
        poly.extend(self.ar_coefficients.iter().map(|phi| -phi));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }

        let mut psi = vec![0.0; horizon.max(1)];
        psi[0] = 1.0;
        for j in 1..psi.len() {
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for k in 1..poly.len().min(j + 1) {
                value -= poly[k] * psi[j - k];
            }
            psi[j] = value;
        }

        psi
    }

    fn intervals(&self, values: &[f64]) -> Result<Vec<(f64, f64)>> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InternalError(e.to_string()))?;
        let z = normal.inverse_cdf(1.0 - (1.0 - self.confidence_level) / 2.0);

        let psi = self.psi_weights(values.len());
        let mut cumulative = 0.0;

        Ok(values
            .iter()
            .zip(psi.iter())
            .map(|(value, weight)| {
                cumulative += weight * weight;
                let margin = z * (self.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect())
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if self.centered.is_empty() {
            return Err(ForecastError::InternalError(
                "Model has not been fitted to data".to_string(),
            ));
        }

        let differenced = self.forecast_differenced(horizon);
        let forecasts = undifference(&differenced, &self.anchors);
        let intervals = self.intervals(&forecasts)?;

        ForecastResult::new_with_intervals(forecasts, horizon, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Conditional sum of squares of an ARMA(p, q) on a centred series
#[derive(Debug, Clone)]
struct CssObjective {
    series: Vec<f64>,
    p: usize,
    q: usize,
}

impl CssObjective {
    /// Sufficient condition for stationarity and invertibility
    fn admissible(&self, params: &[f64]) -> bool {
        self.excess(params) == 0.0
    }

    fn excess(&self, params: &[f64]) -> f64 {
        let (ar, ma) = params.split_at(self.p);
        let ar_sum: f64 = ar.iter().map(|c| c.abs()).sum();
        let ma_sum: f64 = ma.iter().map(|c| c.abs()).sum();
        (ar_sum - 0.999).max(0.0) + (ma_sum - 0.999).max(0.0)
    }

    /// One-step residuals; the first `p` are conditioned to zero
    fn residuals(&self, params: &[f64]) -> Vec<f64> {
        let (ar, ma) = params.split_at(self.p);
        let w = &self.series;
        let mut e = vec![0.0; w.len()];

        for t in self.p..w.len() {
            let mut prediction = 0.0;
            for (i, phi) in ar.iter().enumerate() {
                prediction += phi * w[t - 1 - i];
            }
            for (j, theta) in ma.iter().enumerate() {
                if t > j {
                    prediction += theta * e[t - 1 - j];
                }
            }
            e[t] = w[t] - prediction;
        }

        e
    }
}

impl CostFunction for CssObjective {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        let excess = self.excess(params);
        if excess > 0.0 {
            let scale: f64 = self.series.iter().map(|w| w * w).sum::<f64>() + 1.0;
            return Ok(scale * 1e6 * (1.0 + excess));
        }

        let css = self.residuals(params)[self.p..]
            .iter()
            .map(|e| e * e)
            .sum::<f64>();
        Ok(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psi_weights_random_walk() {
        let model = TrainedArimaModel {
            name: "ARIMA(0,1,0)".to_string(),
            order: ArimaOrder::new(0, 1, 0),
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            drift: 0.0,
            sigma2: 1.0,
            centered: vec![0.0],
            residuals: vec![0.0],
            anchors: vec![10.0],
            confidence_level: 0.95,
        };

        // a random walk accumulates one unit of variance per step
        assert_eq!(model.psi_weights(3), vec![1.0, 1.0, 1.0]);

        let forecast = model.forecast(2).unwrap();
        assert_eq!(forecast.values(), &[10.0, 10.0]);
        let intervals = forecast.intervals().unwrap();
        let first_width = intervals[0].1 - intervals[0].0;
        let second_width = intervals[1].1 - intervals[1].0;
        assert!((second_width / first_width - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_objective_penalises_explosive_parameters() {
        let objective = CssObjective {
            series: vec![0.5, -0.2, 0.1, 0.3],
            p: 1,
            q: 1,
        };

        let inside = objective.cost(&vec![0.2, 0.1]).unwrap();
        let outside = objective.cost(&vec![1.5, 0.1]).unwrap();
        assert!(outside > inside);
        assert!(!objective.admissible(&[0.2, 1.2]));
    }
}
