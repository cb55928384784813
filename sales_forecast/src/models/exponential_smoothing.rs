//! Exponential smoothing baseline for daily series

use crate::data::DailyRecord;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastRow, TrainedForecastModel};
use chrono::NaiveDate;
use series_math::statistics::interval_multiplier;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
    /// Central coverage of the prediction interval
    interval_width: f64,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    name: String,
    alpha: f64,
    /// Final smoothed level
    level: f64,
    /// Spread of the one-step-ahead errors
    residual_std: f64,
    interval_z: f64,
    last_date: NaiveDate,
    training_days: usize,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64, interval_width: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }
        if interval_width <= 0.0 || interval_width >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
            interval_width,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn fit(&self, history: &[DailyRecord]) -> Result<Self::Trained> {
        let last = history.last().ok_or_else(|| {
            ForecastError::TrainingFailed("Empty time series data".to_string())
        })?;

        let mut smoother = series_math::ExponentialSmoothing::new(self.alpha)?;
        for record in history {
            smoother.update(record.amount)?;
        }

        Ok(TrainedExponentialSmoothing {
            name: self.name.clone(),
            alpha: self.alpha,
            level: smoother.value()?,
            residual_std: smoother.residual_std_dev(),
            interval_z: interval_multiplier(self.interval_width)?,
            last_date: last.date,
            training_days: history.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedExponentialSmoothing {
    /// Final smoothed level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Forecast variance grows as `1 + (h - 1) * alpha^2` with horizon `h`
    fn interval_half_width(&self, date: NaiveDate) -> f64 {
        let horizon = (date - self.last_date).num_days().max(1) as f64;
        self.interval_z * self.residual_std * (1.0 + (horizon - 1.0) * self.alpha.powi(2)).sqrt()
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn predict(&self, dates: &[NaiveDate], include_uncertainty: bool) -> Result<Vec<ForecastRow>> {
        // The forecast is flat at the last level
        Ok(dates
            .iter()
            .map(|&date| {
                let bounds = include_uncertainty.then(|| {
                    let half = self.interval_half_width(date);
                    (self.level - half, self.level + half)
                });
                ForecastRow::new(date, self.level, bounds)
            })
            .collect())
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_level_and_flat_forecast() {
        let model = ExponentialSmoothing::new(0.3, 0.8).unwrap();
        let history = vec![
            DailyRecord::actual(ymd(2023, 1, 1), 10.0),
            DailyRecord::actual(ymd(2023, 1, 2), 20.0),
        ];

        let trained = model.fit(&history).unwrap();
        assert_relative_eq!(trained.level(), 13.0, epsilon = 1e-12);
        assert_eq!(trained.last_training_date(), ymd(2023, 1, 2));

        let rows = trained
            .predict(&[ymd(2023, 1, 3), ymd(2023, 1, 10)], true)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| (r.forecast - 13.0).abs() < 1e-12));

        let near = rows[0].upper_bound.unwrap() - rows[0].lower_bound.unwrap();
        let far = rows[1].upper_bound.unwrap() - rows[1].lower_bound.unwrap();
        assert!(far > near);
    }

    #[test]
    fn test_rejects_bad_parameters_and_empty_history() {
        assert!(ExponentialSmoothing::new(1.2, 0.8).is_err());
        assert!(ExponentialSmoothing::new(0.3, 1.0).is_err());

        let model = ExponentialSmoothing::new(0.3, 0.8).unwrap();
        assert!(matches!(
            model.fit(&[]),
            Err(ForecastError::TrainingFailed(_))
        ));
    }
}
