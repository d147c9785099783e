//! Pearson correlation between numeric columns

use crate::statistics::mean;
use crate::{MathError, Result};

/// Pearson correlation coefficient of two equally long series
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Series lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(
            "Correlation needs at least 2 observations".to_string(),
        ));
    }

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    let mut covariance = 0.0;
    let mut x_var = 0.0;
    let mut y_var = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        covariance += (a - x_mean) * (b - y_mean);
        x_var += (a - x_mean).powi(2);
        y_var += (b - y_mean).powi(2);
    }

    if x_var.abs() < 1e-12 || y_var.abs() < 1e-12 {
        return Err(MathError::CalculationError(
            "Correlation is undefined for a constant series".to_string(),
        ));
    }

    Ok(covariance / (x_var.sqrt() * y_var.sqrt()))
}

/// Pairwise correlation matrix; undefined pairs (constant or single-row columns) are NaN
pub fn correlation_matrix(columns: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
    let mut matrix = vec![vec![f64::NAN; columns.len()]; columns.len()];

    for i in 0..columns.len() {
        for j in i..columns.len() {
            let value = match pearson(columns[i], columns[j]) {
                Ok(r) => r,
                Err(MathError::CalculationError(_) | MathError::InsufficientData(_)) => f64::NAN,
                Err(e) => return Err(e),
            };
            matrix[i][j] = value;
            matrix[j][i] = value;
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];

        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &z).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric_with_nan_for_constants() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 1.0, 2.0];
        let c = [5.0, 5.0, 5.0];

        let matrix = correlation_matrix(&[&a, &b, &c]).unwrap();

        assert_relative_eq!(matrix[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(matrix[0][1], matrix[1][0]);
        assert!(matrix[2][0].is_nan());
        assert!(matrix[2][2].is_nan());
    }

    #[test]
    fn test_single_row_matrix_is_nan() {
        let matrix = correlation_matrix(&[&[1.0], &[2.0]]).unwrap();
        assert!(matrix.iter().flatten().all(|r| r.is_nan()));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(MathError::InvalidInput(_))
        ));
    }
}
