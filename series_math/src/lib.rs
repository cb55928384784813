//! # Series Math
//!
//! Numerical building blocks for daily time series forecasting.
//! This crate provides quantiles and summary statistics, a regularised
//! least-squares solver, Fourier seasonal terms and exponential smoothing.

use thiserror::Error;

pub mod fourier;
pub mod regression;
pub mod smoothing;
pub mod statistics;

pub use fourier::FourierSeason;
pub use regression::RidgeRegression;
pub use smoothing::ExponentialSmoothing;
pub use statistics::{quantile, SummaryStats};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
