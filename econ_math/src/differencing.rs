//! Series differencing and its inverse

use crate::{MathError, Result};

/// A series differenced `order` times, together with the anchors needed to
/// integrate forecasts back to the original scale.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencedSeries {
    /// The differenced values
    pub values: Vec<f64>,
    /// Last value of each intermediate level, level 0 being the input
    pub anchors: Vec<f64>,
}

/// Difference a series `order` times
pub fn difference(data: &[f64], order: usize) -> Result<DifferencedSeries> {
    if data.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} observations",
            order, order
        )));
    }

    let mut anchors = Vec::with_capacity(order);
    let mut level = data.to_vec();
    for _ in 0..order {
        anchors.push(level[level.len() - 1]);
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }

    Ok(DifferencedSeries {
        values: level,
        anchors,
    })
}

/// Integrate differenced forecasts back onto the original scale
pub fn undifference(forecasts: &[f64], anchors: &[f64]) -> Vec<f64> {
    let mut result = forecasts.to_vec();

    for &anchor in anchors.iter().rev() {
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let diff = difference(&[1.0, 3.0, 6.0, 10.0], 1).unwrap();
        assert_eq!(diff.values, vec![2.0, 3.0, 4.0]);
        assert_eq!(diff.anchors, vec![10.0]);

        assert_eq!(undifference(&[5.0, 6.0], &diff.anchors), vec![15.0, 21.0]);
    }

    #[test]
    fn test_second_difference_round_trip() {
        let data = [1.0, 3.0, 6.0, 10.0, 15.0];
        let diff = difference(&data, 2).unwrap();
        assert_eq!(diff.values, vec![1.0, 1.0, 1.0]);

        // constant second difference continues the quadratic
        assert_eq!(undifference(&[1.0, 1.0], &diff.anchors), vec![21.0, 28.0]);
    }

    #[test]
    fn test_order_zero_is_identity() {
        let diff = difference(&[4.0, 2.0], 0).unwrap();
        assert_eq!(diff.values, vec![4.0, 2.0]);
        assert_eq!(undifference(&[1.0], &diff.anchors), vec![1.0]);
    }

    #[test]
    fn test_too_short() {
        assert!(difference(&[1.0], 1).is_err());
    }
}
