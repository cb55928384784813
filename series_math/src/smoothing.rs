//! Simple exponential smoothing

use crate::{MathError, Result};

/// Exponential Smoothing implementation
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    values_seen: usize,
    squared_error_sum: f64,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            level: None,
            values_seen: 0,
            squared_error_sum: 0.0,
        })
    }

    /// Update the smoother with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot smooth non-finite value {}",
                value
            )));
        }

        self.values_seen += 1;

        match self.level {
            None => {
                self.level = Some(value);
            }
            Some(current_level) => {
                // One-step-ahead error before the level absorbs the value
                self.squared_error_sum += (value - current_level).powi(2);
                self.level = Some(self.alpha * value + (1.0 - self.alpha) * current_level);
            }
        }

        Ok(())
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Forecast the next value (the forecast equals the last level)
    pub fn forecast(&self) -> Result<f64> {
        self.value()
    }

    /// Standard deviation of the one-step-ahead errors seen so far
    pub fn residual_std_dev(&self) -> f64 {
        if self.values_seen < 2 {
            return 0.0;
        }
        (self.squared_error_sum / (self.values_seen - 1) as f64).sqrt()
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of observations absorbed
    pub fn values_seen(&self) -> usize {
        self.values_seen
    }
}
