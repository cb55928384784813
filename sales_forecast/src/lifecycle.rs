//! Model training and hold-out evaluation
//!
//! Training uses the most recent years of observed data, split at a fixed
//! boundary date into a training part and a test part. The model is fit on
//! the training part and scored on the days that follow it.

use crate::context::ForecastContext;
use crate::data::{DailyRecord, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate, AccuracyMetrics};
use crate::models::{ModelSpec, TrainedForecastModel};
use crate::utils::date_range;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Settings of a training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Last date of the training part; later dates form the test part
    pub boundary: NaiveDate,
    /// Years of history, counted back from the latest actual date, used at all
    pub history_years: u32,
    pub model: ModelSpec,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            boundary: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default(),
            history_years: 2,
            model: ModelSpec::default(),
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub message: String,
    pub model: String,
    pub training_days: usize,
    pub test_days: usize,
    pub mae: f64,
    pub rmse: f64,
    pub mape: Option<f64>,
    pub model_trained: bool,
}

/// Fits models and installs them into a [`ForecastContext`]
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on the context's series and make the result the active model
    ///
    /// The previous model stays active when training fails.
    pub fn train(&self, context: &mut ForecastContext) -> Result<TrainingReport> {
        let (model, report) = self.fit_snapshot(context.series())?;
        context.install_model(model);
        Ok(report)
    }

    /// Fit and evaluate a model without touching any shared state
    pub fn fit_snapshot(
        &self,
        series: &HistoricalSeries,
    ) -> Result<(Arc<dyn TrainedForecastModel>, TrainingReport)> {
        // Back-filled forecasts must not move the history window
        let last_date = series.actuals().last().map(|r| r.date).ok_or_else(|| {
            ForecastError::NotReady("No data uploaded. Please upload data first.".to_string())
        })?;

        let cutoff = self.cutoff(last_date);
        let (train, test): (Vec<DailyRecord>, Vec<DailyRecord>) = series
            .actuals()
            .filter(|r| r.date >= cutoff)
            .partition(|r| r.date <= self.config.boundary);
        debug!(
            %cutoff,
            boundary = %self.config.boundary,
            train = train.len(),
            test = test.len(),
            "split training history"
        );

        let model = self.config.model.fit_shared(&train).map_err(|err| {
            warn!(error = %err, "model fitting failed");
            match err {
                ForecastError::TrainingFailed(_) => err,
                other => ForecastError::TrainingFailed(other.to_string()),
            }
        })?;

        let metrics = if test.is_empty() {
            evaluate(&[], &[])
        } else {
            self.evaluate_holdout(model.as_ref(), &test)?
        };

        info!(
            model = model.name(),
            training_days = train.len(),
            test_days = test.len(),
            mae = metrics.mae,
            rmse = metrics.rmse,
            "model trained"
        );

        let report = TrainingReport {
            message: "Model trained successfully".to_string(),
            model: model.name().to_string(),
            training_days: train.len(),
            test_days: test.len(),
            mae: metrics.mae,
            rmse: metrics.rmse,
            mape: metrics.mape,
            model_trained: true,
        };

        Ok((model, report))
    }

    /// Earliest date kept for training, clamped for Feb 29
    fn cutoff(&self, last_date: NaiveDate) -> NaiveDate {
        last_date
            .checked_sub_months(Months::new(self.config.history_years * 12))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Score the days following the training data against the test rows
    fn evaluate_holdout(
        &self,
        model: &dyn TrainedForecastModel,
        test: &[DailyRecord],
    ) -> Result<AccuracyMetrics> {
        let start = model
            .last_training_date()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ForecastError::TrainingFailed("Date out of range".to_string()))?;
        let end = start
            .checked_add_days(Days::new(test.len() as u64 - 1))
            .ok_or_else(|| ForecastError::TrainingFailed("Date out of range".to_string()))?;

        let predictions = model
            .predict(&date_range(start, end), false)
            .map_err(|err| ForecastError::TrainingFailed(err.to_string()))?;
        let predicted: HashMap<NaiveDate, f64> = predictions
            .into_iter()
            .filter(|row| row.date > self.config.boundary)
            .map(|row| (row.date, row.forecast))
            .collect();

        let (actual, forecast): (Vec<f64>, Vec<f64>) = test
            .iter()
            .filter_map(|r| predicted.get(&r.date).map(|&p| (r.amount, p)))
            .unzip();
        debug!(overlap = actual.len(), "evaluated hold-out days");

        Ok(evaluate(&actual, &forecast))
    }
}
