//! Forecast generation over a date range

use crate::context::ForecastContext;
use crate::data::{BackfillStats, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastRow, TrainedForecastModel};
use crate::utils::{date_range, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::SummaryStats;
use tracing::info;

fn default_include_uncertainty() -> bool {
    true
}

/// A request to forecast every day between two dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_include_uncertainty")]
    pub include_uncertainty: bool,
}

impl ForecastRequest {
    pub fn new(start_date: &str, end_date: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            include_uncertainty: true,
        }
    }

    /// Parsed `(start, end)`; the start must come strictly before the end
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let start = parse_date(&self.start_date).ok_or_else(|| {
            ForecastError::InvalidRange(format!("Invalid start_date: {}", self.start_date))
        })?;
        let end = parse_date(&self.end_date).ok_or_else(|| {
            ForecastError::InvalidRange(format!("Invalid end_date: {}", self.end_date))
        })?;

        if start >= end {
            return Err(ForecastError::InvalidRange(
                "Start date must be before end date".to_string(),
            ));
        }
        Ok((start, end))
    }
}

/// Aggregate statistics of the point estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_days: usize,
    pub average_daily_forecast: f64,
    pub total_forecast: f64,
    pub min_forecast: f64,
    pub max_forecast: f64,
    /// Sample standard deviation; zero for a single day
    pub std_forecast: f64,
}

impl ForecastSummary {
    fn from_rows(rows: &[ForecastRow]) -> Result<Self> {
        let values: Vec<f64> = rows.iter().map(|r| r.forecast).collect();
        let stats = SummaryStats::from_values(&values)
            .map_err(|err| ForecastError::ForecastFailed(err.to_string()))?;

        Ok(Self {
            total_days: stats.count,
            average_daily_forecast: stats.mean,
            total_forecast: stats.sum,
            min_forecast: stats.min,
            max_forecast: stats.max,
            std_forecast: stats.std_dev.unwrap_or(0.0),
        })
    }
}

/// Daily forecast rows and their summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub rows: Vec<ForecastRow>,
    pub summary: ForecastSummary,
    /// Whether the rows carry interval bounds
    pub include_uncertainty: bool,
}

/// Forecast every day from `start` to `end`, both inclusive
pub fn generate(
    model: &dyn TrainedForecastModel,
    start: NaiveDate,
    end: NaiveDate,
    include_uncertainty: bool,
) -> Result<ForecastOutput> {
    let dates = date_range(start, end);
    let rows = model
        .predict(&dates, include_uncertainty)
        .map_err(|err| match err {
            ForecastError::ForecastFailed(_) => err,
            other => ForecastError::ForecastFailed(other.to_string()),
        })?;
    let summary = ForecastSummary::from_rows(&rows)?;

    Ok(ForecastOutput {
        rows,
        summary,
        include_uncertainty,
    })
}

/// Merge generated rows into `series` as `Forecast` provenance
///
/// Observed actuals are never overwritten; see [`HistoricalSeries::backfill`].
pub fn backfill(series: &mut HistoricalSeries, output: &ForecastOutput) -> BackfillStats {
    let stats = series.backfill(output.rows.iter().map(|r| (r.date, r.forecast)));
    info!(
        start = ?output.rows.first().map(|r| r.date),
        end = ?output.rows.last().map(|r| r.date),
        days = output.summary.total_days,
        appended = stats.appended,
        replaced = stats.replaced,
        preserved = stats.preserved,
        "forecast back-filled"
    );
    stats
}

/// Forecast the requested range with the active model and back-fill the series
pub fn forecast(context: &mut ForecastContext, request: &ForecastRequest) -> Result<ForecastOutput> {
    let model = context.active_model()?;
    let (start, end) = request.date_range()?;

    let output = generate(model.as_ref(), start, end, request.include_uncertainty)?;
    backfill(context.series_mut(), &output);
    Ok(output)
}
