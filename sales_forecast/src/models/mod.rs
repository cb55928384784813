//! Forecasting models for daily sales series

use crate::data::DailyRecord;
use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    /// Point estimate
    pub forecast: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    pub day_of_week: String,
    pub month: String,
    pub year: i32,
}

impl ForecastRow {
    /// Create a row, with `(lower, upper)` bounds when uncertainty was requested
    pub fn new(date: NaiveDate, forecast: f64, bounds: Option<(f64, f64)>) -> Self {
        Self {
            date,
            forecast,
            lower_bound: bounds.map(|(lower, _)| lower),
            upper_bound: bounds.map(|(_, upper)| upper),
            day_of_week: date.format("%A").to_string(),
            month: date.format("%B").to_string(),
            year: date.year(),
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Predict every date in `dates`, with interval bounds when `include_uncertainty` is set
    fn predict(&self, dates: &[NaiveDate], include_uncertainty: bool) -> Result<Vec<ForecastRow>>;

    /// Last date seen during training
    fn last_training_date(&self) -> NaiveDate;

    /// Number of daily observations the model was fit on
    fn training_days(&self) -> usize;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fit on a daily series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Fit the model on daily records sorted by date
    fn fit(&self, history: &[DailyRecord]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// The model variants the lifecycle can train
#[derive(Debug, Clone)]
pub enum ModelSpec {
    Seasonal(seasonal::SeasonalRegression),
    Smoothing(exponential_smoothing::ExponentialSmoothing),
}

impl ModelSpec {
    /// Fit the selected variant and erase its concrete type
    pub fn fit_shared(&self, history: &[DailyRecord]) -> Result<Arc<dyn TrainedForecastModel>> {
        match self {
            ModelSpec::Seasonal(model) => Ok(Arc::new(model.fit(history)?)),
            ModelSpec::Smoothing(model) => Ok(Arc::new(model.fit(history)?)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ModelSpec::Seasonal(model) => model.name(),
            ModelSpec::Smoothing(model) => model.name(),
        }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        ModelSpec::Seasonal(seasonal::SeasonalRegression::default())
    }
}

pub mod exponential_smoothing;
pub mod seasonal;
