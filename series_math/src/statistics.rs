//! Descriptive statistics over daily amounts
//!
//! Quantiles use linear interpolation between order statistics, and the
//! standard deviation is the sample (n - 1) estimate.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Compute the `q`-th quantile (0.0..=1.0) of `values`
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be within [0, 1], got {}",
            q
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Sample contains non-finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation, `None` with fewer than two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Two-sided standard normal multiplier for a central interval of `width`
///
/// An 80% interval gives roughly 1.2816.
pub fn interval_multiplier(width: f64) -> Result<f64> {
    if width <= 0.0 || width >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "Interval width must be between 0 and 1 (exclusive), got {}",
            width
        )));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MathError::CalculationError(format!("Standard normal unavailable: {}", e)))?;

    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}

/// Summary of a non-empty sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; absent for a single observation
    pub std_dev: Option<f64>,
}

impl SummaryStats {
    /// Summarise `values`
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let mean = mean(values).ok_or_else(|| {
            MathError::InsufficientData("Cannot summarise an empty sample".to_string())
        })?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            count: values.len(),
            sum: values.iter().sum(),
            mean,
            min,
            max,
            std_dev: sample_std_dev(values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 3.0);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 5.0);
        // position 0.6 between 1.0 and 2.0
        assert_relative_eq!(quantile(&values, 0.15).unwrap(), 1.6, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.85).unwrap(), 4.4, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_ignores_input_order() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(quantile(&values, 0.15).unwrap(), 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_rejects_bad_input() {
        assert!(matches!(
            quantile(&[], 0.5),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            quantile(&[1.0], 1.5),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            quantile(&[1.0, f64::NAN], 0.5),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_summary_stats() {
        let stats = SummaryStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_relative_eq!(stats.sum, 40.0);
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.min, 2.0);
        assert_relative_eq!(stats.max, 9.0);
        assert_relative_eq!(stats.std_dev.unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);

        let single = SummaryStats::from_values(&[3.0]).unwrap();
        assert!(single.std_dev.is_none());

        assert!(SummaryStats::from_values(&[]).is_err());
    }

    #[test]
    fn test_interval_multiplier() {
        assert_relative_eq!(interval_multiplier(0.8).unwrap(), 1.2816, epsilon = 1e-3);
        assert_relative_eq!(interval_multiplier(0.95).unwrap(), 1.96, epsilon = 1e-3);
        assert!(interval_multiplier(1.0).is_err());
        assert!(interval_multiplier(0.0).is_err());
    }
}
