//! Error types for the sales_forecast crate

use series_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input is missing required columns or carries unparseable values
    #[error("Schema error: {0}")]
    Schema(String),

    /// A prerequisite step (upload or training) has not completed
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Dates or months outside their allowed domain
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Model hyperparameters outside their valid domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model fitting or evaluation failed
    #[error("Error training model: {0}")]
    TrainingFailed(String),

    /// Forecast generation failed
    #[error("Error generating forecast: {0}")]
    ForecastFailed(String),

    /// Comparison aggregation failed
    #[error("Error generating comparison: {0}")]
    ComparisonFailed(String),

    /// Error from numerical routines
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// Whether the caller can fix the error by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::Schema(_) | ForecastError::NotReady(_) | ForecastError::InvalidRange(_)
        )
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Schema(_) => "schema_error",
            ForecastError::NotReady(_) => "not_ready",
            ForecastError::InvalidRange(_) => "invalid_range",
            ForecastError::InvalidParameter(_) => "invalid_parameter",
            ForecastError::TrainingFailed(_) => "training_failure",
            ForecastError::ForecastFailed(_) => "forecast_failure",
            ForecastError::ComparisonFailed(_) => "comparison_failure",
            ForecastError::Math(_) => "math_error",
            ForecastError::Io(_) => "io_error",
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Schema(err.to_string())
    }
}
