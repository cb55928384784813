//! Fourier terms for periodic seasonal components

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A seasonal component expressed as a truncated Fourier series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourierSeason {
    name: String,
    period: f64,
    order: usize,
}

impl FourierSeason {
    /// Create a seasonal component with `period` (in days) and `order` harmonics
    pub fn new(name: &str, period: f64, order: usize) -> Result<Self> {
        if period.is_nan() || period <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Seasonal period must be positive, got {}",
                period
            )));
        }
        if order == 0 {
            return Err(MathError::InvalidInput(
                "Fourier order must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            period,
            order,
        })
    }

    /// Name of the component
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Period in days
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Number of harmonics
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of regression columns this component contributes
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Append the sin/cos terms for time `t` (in days) to `row`
    pub fn extend_row(&self, t: f64, row: &mut Vec<f64>) {
        for n in 1..=self.order {
            let angle = 2.0 * PI * n as f64 * t / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }

    /// The sin/cos terms for time `t` (in days)
    pub fn terms(&self, t: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        self.extend_row(t, &mut row);
        row
    }
}
