//! Application state shared across all handlers

use crate::config::Config;
use sales_forecast::{ForecastContext, Result, Trainer};
use tokio::sync::RwLock;

/// Forecasting state behind a single-writer lock, plus the trainer settings
#[derive(Debug)]
pub struct AppState {
    pub context: RwLock<ForecastContext>,
    pub trainer: Trainer,
    pub config: Config,
}

impl AppState {
    /// Create an empty state; fails if the configured model settings are invalid
    pub fn new(config: Config) -> Result<Self> {
        let trainer = Trainer::new(config.training_config()?);
        Ok(Self {
            context: RwLock::new(ForecastContext::new()),
            trainer,
            config,
        })
    }
}
