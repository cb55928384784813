//! Seasonal regression model
//!
//! The daily value is modelled as a piecewise-linear trend plus Fourier
//! seasonal components (yearly, weekly, and any extra periods such as a
//! 30.5-day monthly cycle). Coefficients are estimated by ridge regression
//! on the max-abs scaled series, where each block of columns is penalised
//! according to its prior scale: a small trend-flexibility prior keeps the
//! changepoint slopes close to zero, a large seasonality prior leaves the
//! seasonal terms nearly free.
//!
//! Prediction intervals are symmetric around the point estimate, sized from
//! the in-sample residual spread and widened with the distance past the end
//! of the training data.

use crate::data::DailyRecord;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastRow, TrainedForecastModel};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use series_math::statistics::interval_multiplier;
use series_math::{FourierSeason, RidgeRegression};
use tracing::debug;

/// Noise scale against which prior scales are turned into ridge penalties
const PRIOR_NOISE_SCALE: f64 = 0.1;

/// Prior scale of the base trend slope
const TREND_PRIOR_SCALE: f64 = 5.0;

/// An additional seasonal component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySpec {
    pub name: String,
    /// Period in days
    pub period: f64,
    /// Number of Fourier harmonics
    pub fourier_order: usize,
}

/// Hyperparameters of the seasonal regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    /// Trend flexibility; smaller values give a stiffer trend
    pub changepoint_prior_scale: f64,
    /// Seasonality strength; larger values allow larger seasonal swings
    pub seasonality_prior_scale: f64,
    /// Central coverage of the prediction interval
    pub interval_width: f64,
    /// Maximum number of potential trend changepoints
    pub n_changepoints: usize,
    /// Share of the history in which changepoints may be placed
    pub changepoint_range: f64,
    pub extra_seasonalities: Vec<SeasonalitySpec>,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            changepoint_prior_scale: 0.1,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
            n_changepoints: 25,
            changepoint_range: 0.8,
            extra_seasonalities: vec![SeasonalitySpec {
                name: "monthly".to_string(),
                period: 30.5,
                fourier_order: 5,
            }],
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Seasonal regression model
#[derive(Debug, Clone)]
pub struct SeasonalRegression {
    name: String,
    config: SeasonalConfig,
}

impl SeasonalRegression {
    /// Create a model after validating `config`
    pub fn new(config: SeasonalConfig) -> Result<Self> {
        if !is_positive(config.changepoint_prior_scale) {
            return Err(ForecastError::InvalidParameter(
                "changepoint_prior_scale must be a positive number".to_string(),
            ));
        }
        if !is_positive(config.seasonality_prior_scale) {
            return Err(ForecastError::InvalidParameter(
                "seasonality_prior_scale must be a positive number".to_string(),
            ));
        }
        if !(config.interval_width > 0.0 && config.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "interval_width must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if !(config.changepoint_range > 0.0 && config.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(
                "changepoint_range must be within (0, 1]".to_string(),
            ));
        }
        // Surface bad periods/orders here rather than at fit time
        for spec in &config.extra_seasonalities {
            FourierSeason::new(&spec.name, spec.period, spec.fourier_order)?;
        }

        Ok(Self {
            name: "Seasonal Regression".to_string(),
            config,
        })
    }

    /// Add a seasonal component on top of the configured ones
    pub fn with_seasonality(mut self, name: &str, period: f64, fourier_order: usize) -> Result<Self> {
        FourierSeason::new(name, period, fourier_order)?;
        self.config.extra_seasonalities.push(SeasonalitySpec {
            name: name.to_string(),
            period,
            fourier_order,
        });
        Ok(self)
    }

    pub fn config(&self) -> &SeasonalConfig {
        &self.config
    }

    fn seasons(&self) -> Result<Vec<FourierSeason>> {
        let mut seasons = Vec::new();
        if self.config.yearly_seasonality {
            seasons.push(FourierSeason::new("yearly", 365.25, 10)?);
        }
        if self.config.weekly_seasonality {
            seasons.push(FourierSeason::new("weekly", 7.0, 3)?);
        }
        if self.config.daily_seasonality {
            seasons.push(FourierSeason::new("daily", 1.0, 4)?);
        }
        for spec in &self.config.extra_seasonalities {
            seasons.push(FourierSeason::new(&spec.name, spec.period, spec.fourier_order)?);
        }
        Ok(seasons)
    }

    /// Scaled changepoint locations spread over the first part of the history
    fn changepoints(&self, scaled_times: &[f64]) -> Vec<f64> {
        let history = (scaled_times.len() as f64 * self.config.changepoint_range).floor() as usize;
        let count = self.config.n_changepoints.min(history.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }

        let mut points: Vec<f64> = (1..=count)
            .map(|i| {
                let idx = (i as f64 * (history - 1) as f64 / count as f64).round() as usize;
                scaled_times[idx]
            })
            .collect();
        points.dedup();
        points
    }
}

impl Default for SeasonalRegression {
    fn default() -> Self {
        Self {
            name: "Seasonal Regression".to_string(),
            config: SeasonalConfig::default(),
        }
    }
}

/// Column layout of the regression design matrix
#[derive(Debug, Clone)]
struct DesignLayout {
    origin: NaiveDate,
    span_days: f64,
    changepoints: Vec<f64>,
    seasons: Vec<FourierSeason>,
}

impl DesignLayout {
    /// Regression columns: intercept, slope, changepoint hinges, seasonal terms
    fn row(&self, date: NaiveDate) -> Vec<f64> {
        let t = (date - self.origin).num_days() as f64 / self.span_days;
        let absolute_day = date.num_days_from_ce() as f64;

        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&c| (t - c).max(0.0)));
        for season in &self.seasons {
            season.extend_row(absolute_day, &mut row);
        }
        row
    }

    fn seasonal_width(&self) -> usize {
        self.seasons.iter().map(|s| s.width()).sum()
    }

    fn width(&self) -> usize {
        2 + self.changepoints.len() + self.seasonal_width()
    }

    fn penalties(&self, config: &SeasonalConfig) -> Vec<f64> {
        let penalty = |scale: f64| (PRIOR_NOISE_SCALE / scale).powi(2);

        let mut penalties = Vec::with_capacity(self.width());
        penalties.push(0.0);
        penalties.push(penalty(TREND_PRIOR_SCALE));
        penalties.extend(
            std::iter::repeat(penalty(config.changepoint_prior_scale)).take(self.changepoints.len()),
        );
        penalties.extend(
            std::iter::repeat(penalty(config.seasonality_prior_scale)).take(self.seasonal_width()),
        );
        penalties
    }
}

/// Trained seasonal regression model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalRegression {
    name: String,
    layout: DesignLayout,
    regression: RidgeRegression,
    last_date: NaiveDate,
    y_scale: f64,
    residual_std: f64,
    interval_z: f64,
    training_days: usize,
}

impl ForecastModel for SeasonalRegression {
    type Trained = TrainedSeasonalRegression;

    fn fit(&self, history: &[DailyRecord]) -> Result<Self::Trained> {
        if history.len() < 2 {
            return Err(ForecastError::TrainingFailed(format!(
                "Seasonal regression needs at least 2 daily observations, got {}",
                history.len()
            )));
        }

        let origin = history[0].date;
        let last_date = history[history.len() - 1].date;
        let span_days = ((last_date - origin).num_days() as f64).max(1.0);

        let max_abs = history.iter().map(|r| r.amount.abs()).fold(0.0, f64::max);
        let y_scale = if max_abs > 0.0 { max_abs } else { 1.0 };

        let scaled_times: Vec<f64> = history
            .iter()
            .map(|r| (r.date - origin).num_days() as f64 / span_days)
            .collect();

        let layout = DesignLayout {
            origin,
            span_days,
            changepoints: self.changepoints(&scaled_times),
            seasons: self.seasons()?,
        };

        let penalties = layout.penalties(&self.config);
        let rows: Vec<Vec<f64>> = history.iter().map(|r| layout.row(r.date)).collect();
        let targets: Vec<f64> = history.iter().map(|r| r.amount / y_scale).collect();
        let regression = RidgeRegression::fit(&rows, &targets, &penalties)?;

        let squared_error: f64 = rows
            .iter()
            .zip(history.iter())
            .map(|(row, r)| (r.amount - regression.predict(row) * y_scale).powi(2))
            .sum();
        let residual_std = (squared_error / history.len() as f64).sqrt();

        debug!(
            rows = history.len(),
            columns = penalties.len(),
            changepoints = layout.changepoints.len(),
            residual_std,
            "fitted seasonal regression"
        );

        Ok(TrainedSeasonalRegression {
            name: self.name.clone(),
            layout,
            regression,
            last_date,
            y_scale,
            residual_std,
            interval_z: interval_multiplier(self.config.interval_width)?,
            training_days: history.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalRegression {
    /// Half-width of the interval for `date`
    fn interval_half_width(&self, date: NaiveDate) -> f64 {
        let days_ahead = (date - self.last_date).num_days().max(0) as f64;
        self.interval_z * self.residual_std * (1.0 + days_ahead / self.layout.span_days).sqrt()
    }

    /// Standard deviation of the in-sample residuals
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Names of the seasonal components in the model
    pub fn seasonality_names(&self) -> Vec<&str> {
        self.layout.seasons.iter().map(|s| s.name()).collect()
    }
}

impl TrainedForecastModel for TrainedSeasonalRegression {
    fn predict(&self, dates: &[NaiveDate], include_uncertainty: bool) -> Result<Vec<ForecastRow>> {
        dates
            .iter()
            .map(|&date| {
                let estimate = self.regression.predict(&self.layout.row(date)) * self.y_scale;
                if !estimate.is_finite() {
                    return Err(ForecastError::ForecastFailed(format!(
                        "Model produced a non-finite estimate for {}",
                        date
                    )));
                }

                let bounds = include_uncertainty.then(|| {
                    let half = self.interval_half_width(date);
                    (estimate - half, estimate + half)
                });
                Ok(ForecastRow::new(date, estimate, bounds))
            })
            .collect()
    }

    fn last_training_date(&self) -> NaiveDate {
        self.last_date
    }

    fn training_days(&self) -> usize {
        self.training_days
    }

    fn name(&self) -> &str {
        &self.name
    }
}
