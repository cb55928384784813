//! Same-month comparison across years
//!
//! Daily values of one calendar month are collected for each requested year
//! and, when a model is active, for a forecast year. Each year becomes one
//! chart series with its own line style and a row of summary statistics.

use crate::context::ForecastContext;
use crate::error::{ForecastError, Result};
use crate::forecast::generate;
use crate::utils::{month_name, month_window};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use series_math::SummaryStats;
use std::collections::HashSet;
use tracing::{info, warn};

/// Line colors, cycled by the year's position in the request
const COLORS: [&str; 8] = [
    "blue", "green", "orange", "purple", "red", "brown", "pink", "gray",
];

/// Dash styles, cycled by the year's position in the request
const DASHES: [&str; 4] = ["solid", "dash", "dot", "dashdot"];

/// A request to compare one month across several years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Calendar month, 1 to 12
    pub month: u32,
    pub years: Vec<i32>,
    /// Year to forecast for the same month, if a model is active
    #[serde(default)]
    pub include_forecast_year: Option<i32>,
}

impl ComparisonRequest {
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(ForecastError::InvalidRange(format!(
                "Month must be between 1 and 12, got {}",
                self.month
            )));
        }
        Ok(())
    }

    /// Requested years without repeats, in request order
    fn distinct_years(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.years
            .iter()
            .copied()
            .filter(|year| seen.insert(*year))
            .collect()
    }
}

/// How a series is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: String,
    pub dash: String,
    pub width: f64,
    /// Marker symbol and size for highlighted series
    pub marker: Option<(String, f64)>,
}

impl SeriesStyle {
    /// Style of the `index`-th observed year
    pub fn for_index(index: usize) -> Self {
        Self {
            color: COLORS[index % COLORS.len()].to_string(),
            dash: DASHES[index % DASHES.len()].to_string(),
            width: 2.0,
            marker: None,
        }
    }

    /// Style of the forecast year
    pub fn forecast() -> Self {
        Self {
            color: "red".to_string(),
            dash: "dashdot".to_string(),
            width: 3.0,
            marker: Some(("diamond".to_string(), 8.0)),
        }
    }
}

/// One day of a compared month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    /// Day of month
    pub day: u32,
    pub amount: f64,
}

/// Daily values of the month in one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub label: String,
    pub year: i32,
    pub is_forecast: bool,
    pub style: SeriesStyle,
    pub points: Vec<ComparisonPoint>,
}

/// Summary statistics for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub label: String,
    pub total_amount: f64,
    pub average_daily_amount: f64,
    pub max_daily_amount: f64,
    pub min_daily_amount: f64,
    pub days_with_data: usize,
}

impl YearSummary {
    fn from_series(series: &ComparisonSeries) -> Result<Self> {
        let amounts: Vec<f64> = series.points.iter().map(|p| p.amount).collect();
        let stats = SummaryStats::from_values(&amounts)
            .map_err(|err| ForecastError::ComparisonFailed(err.to_string()))?;

        Ok(Self {
            label: series.label.clone(),
            total_amount: stats.sum,
            average_daily_amount: stats.mean,
            max_daily_amount: stats.max,
            min_daily_amount: stats.min,
            days_with_data: stats.count,
        })
    }
}

/// Series and summaries in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub month: u32,
    pub month_name: String,
    pub series: Vec<ComparisonSeries>,
    pub summary: Vec<YearSummary>,
}

/// Compare `request.month` across the requested years
///
/// Years without data in that month are left out. Forecast values produced
/// here are not written back into the series.
pub fn compare(context: &ForecastContext, request: &ComparisonRequest) -> Result<ComparisonOutput> {
    if !context.has_data() {
        return Err(ForecastError::NotReady(
            "No data uploaded. Please upload data first.".to_string(),
        ));
    }
    request.validate()?;

    let mut series = Vec::new();
    for (index, year) in request.distinct_years().into_iter().enumerate() {
        let (start, end) = month_window(year, request.month)?;
        let points: Vec<ComparisonPoint> = context
            .series()
            .window(start, end)
            .iter()
            .map(|r| ComparisonPoint {
                date: r.date,
                day: r.date.day(),
                amount: r.amount,
            })
            .collect();

        if points.is_empty() {
            continue;
        }
        series.push(ComparisonSeries {
            label: year.to_string(),
            year,
            is_forecast: false,
            style: SeriesStyle::for_index(index),
            points,
        });
    }

    if let Some(year) = request.include_forecast_year {
        match context.active_model() {
            Ok(model) => {
                let (start, end) = month_window(year, request.month)?;
                let output = generate(model.as_ref(), start, end, false)
                    .map_err(|err| ForecastError::ComparisonFailed(err.to_string()))?;
                series.push(ComparisonSeries {
                    label: format!("{} (Forecast)", year),
                    year,
                    is_forecast: true,
                    style: SeriesStyle::forecast(),
                    points: output
                        .rows
                        .iter()
                        .map(|r| ComparisonPoint {
                            date: r.date,
                            day: r.date.day(),
                            amount: r.forecast,
                        })
                        .collect(),
                });
            }
            Err(_) => warn!(year, "no trained model; skipping forecast year"),
        }
    }

    let summary = series
        .iter()
        .map(YearSummary::from_series)
        .collect::<Result<Vec<_>>>()?;

    info!(
        month = request.month,
        series = series.len(),
        "comparison generated"
    );

    Ok(ComparisonOutput {
        month: request.month,
        month_name: month_name(request.month).to_string(),
        series,
        summary,
    })
}
