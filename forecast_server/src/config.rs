//! Service configuration from environment variables

use chrono::NaiveDate;
use sales_forecast::models::exponential_smoothing::ExponentialSmoothing;
use sales_forecast::models::seasonal::{SeasonalConfig, SeasonalRegression};
use sales_forecast::{ModelSpec, Result, TrainingConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smoothing factor used when the exponential smoothing model is selected
const SMOOTHING_ALPHA: f64 = 0.3;

/// Which forecasting model training fits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Seasonal,
    Smoothing,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seasonal" => Ok(ModelKind::Seasonal),
            "smoothing" => Ok(ModelKind::Smoothing),
            other => Err(format!("unknown model kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    pub model: ModelKind,
    /// Last date of the training split
    pub train_boundary: NaiveDate,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub interval_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        let seasonal = SeasonalConfig::default();
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            model: ModelKind::Seasonal,
            train_boundary: TrainingConfig::default().boundary,
            changepoint_prior_scale: seasonal.changepoint_prior_scale,
            seasonality_prior_scale: seasonal.seasonality_prior_scale,
            interval_width: seasonal.interval_width,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file if present. Unset or unparseable variables keep
    /// their defaults.
    pub fn from_env() -> Self {
        // A missing .env file is the normal case outside development
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            model: env_or("FORECAST_MODEL", defaults.model),
            train_boundary: env_or("TRAIN_BOUNDARY", defaults.train_boundary),
            changepoint_prior_scale: env_or(
                "CHANGEPOINT_PRIOR_SCALE",
                defaults.changepoint_prior_scale,
            ),
            seasonality_prior_scale: env_or(
                "SEASONALITY_PRIOR_SCALE",
                defaults.seasonality_prior_scale,
            ),
            interval_width: env_or("INTERVAL_WIDTH", defaults.interval_width),
        }
    }

    /// Training settings for the configured model
    pub fn training_config(&self) -> Result<TrainingConfig> {
        let model = match self.model {
            ModelKind::Seasonal => ModelSpec::Seasonal(SeasonalRegression::new(SeasonalConfig {
                changepoint_prior_scale: self.changepoint_prior_scale,
                seasonality_prior_scale: self.seasonality_prior_scale,
                interval_width: self.interval_width,
                ..SeasonalConfig::default()
            })?),
            ModelKind::Smoothing => ModelSpec::Smoothing(ExponentialSmoothing::new(
                SMOOTHING_ALPHA,
                self.interval_width,
            )?),
        };

        Ok(TrainingConfig {
            boundary: self.train_boundary,
            model,
            ..TrainingConfig::default()
        })
    }
}
