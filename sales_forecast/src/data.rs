//! Transaction ingestion and the daily historical series
//!
//! Uploaded CSV content is parsed into [`TransactionRecord`]s, cleaned of
//! outliers with a widened inter-quantile fence and summed per calendar day
//! into a [`HistoricalSeries`].

use crate::error::{ForecastError, Result};
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::quantile;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Header names accepted for the date column, after normalisation
const DATE_COLUMNS: [&str; 2] = ["transaction date", "transaction_date"];

/// Header names accepted for the amount column, after normalisation
const AMOUNT_COLUMNS: [&str; 2] = ["amount", "spend"];

/// Quantiles bounding the inter-quantile range used for outlier fences
const LOWER_QUANTILE: f64 = 0.15;
const UPPER_QUANTILE: f64 = 0.85;

/// Fence width in multiples of the inter-quantile range
const FENCE_MULTIPLIER: f64 = 2.0;

/// A single uploaded transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Where a daily value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Aggregated from uploaded transactions
    Actual,
    /// Back-filled from a generated forecast
    Forecast,
}

/// One calendar day of the historical series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub provenance: Provenance,
}

impl DailyRecord {
    /// An observed daily total
    pub fn actual(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount,
            provenance: Provenance::Actual,
        }
    }

    /// A forecasted daily value
    pub fn forecast(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount,
            provenance: Provenance::Forecast,
        }
    }

    pub fn is_actual(&self) -> bool {
        self.provenance == Provenance::Actual
    }
}

/// Outcome of merging forecast values into the series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillStats {
    /// Dates that were not in the series before
    pub appended: usize,
    /// Earlier forecast values replaced by the newer ones
    pub replaced: usize,
    /// Dates left alone because they hold actual values
    pub preserved: usize,
}

/// Daily series with unique, strictly increasing dates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    records: Vec<DailyRecord>,
}

impl HistoricalSeries {
    /// Build a series of actual values from per-day totals
    pub fn from_daily_totals(totals: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            records: totals
                .into_iter()
                .map(|(date, amount)| DailyRecord::actual(date, amount))
                .collect(),
        }
    }

    /// Build a series from arbitrary records; later records win on duplicate dates
    pub fn from_records(records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let by_date: BTreeMap<NaiveDate, DailyRecord> =
            records.into_iter().map(|r| (r.date, r)).collect();

        Self {
            records: by_date.into_values().collect(),
        }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter()
    }

    /// Only the rows aggregated from uploaded data
    pub fn actuals(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter().filter(|r| r.is_actual())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Value stored for `date`, if any
    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Rows with `start <= date <= end`
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[DailyRecord] {
        let from = self.records.partition_point(|r| r.date < start);
        let to = self.records.partition_point(|r| r.date <= end);
        if from >= to {
            &[]
        } else {
            &self.records[from..to]
        }
    }

    /// Merge forecast values into the series
    ///
    /// New dates are appended, dates holding an earlier forecast take the new
    /// value, and dates holding actual values are never overwritten.
    pub fn backfill(&mut self, values: impl IntoIterator<Item = (NaiveDate, f64)>) -> BackfillStats {
        let mut stats = BackfillStats::default();
        let mut by_date: BTreeMap<NaiveDate, DailyRecord> =
            self.records.drain(..).map(|r| (r.date, r)).collect();

        for (date, amount) in values {
            match by_date.entry(date) {
                Entry::Vacant(slot) => {
                    slot.insert(DailyRecord::forecast(date, amount));
                    stats.appended += 1;
                }
                Entry::Occupied(slot) if slot.get().is_actual() => {
                    stats.preserved += 1;
                }
                Entry::Occupied(mut slot) => {
                    slot.get_mut().amount = amount;
                    stats.replaced += 1;
                }
            }
        }

        self.records = by_date.into_values().collect();
        stats
    }
}

/// Fences outside which a transaction amount is treated as an outlier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Fences at `Q1 - 2*IQR` and `Q3 + 2*IQR` using the 15th/85th percentiles
    pub fn from_amounts(amounts: &[f64]) -> Result<Self> {
        let q1 = quantile(amounts, LOWER_QUANTILE)?;
        let q3 = quantile(amounts, UPPER_QUANTILE)?;
        let iqr = q3 - q1;

        Ok(Self {
            lower: q1 - FENCE_MULTIPLIER * iqr,
            upper: q3 + FENCE_MULTIPLIER * iqr,
        })
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower && amount <= self.upper
    }
}

/// First and last date of the cleaned data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Summary returned after a successful ingestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionReport {
    pub message: String,
    pub total_records: usize,
    pub outliers_removed: usize,
    pub clean_records: usize,
    pub daily_records: usize,
    pub date_range: DateSpan,
}

/// Output of the cleaning pipeline, ready to replace the shared state
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    clean_records: Vec<TransactionRecord>,
    series: HistoricalSeries,
    report: IngestionReport,
}

impl CleanedDataset {
    /// Sort, drop outliers and aggregate per calendar day
    pub fn from_records(mut records: Vec<TransactionRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::Schema(
                "Uploaded data contains no transaction rows".to_string(),
            ));
        }

        records.sort_by_key(|r| r.date);
        let total_records = records.len();

        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        let bounds = OutlierBounds::from_amounts(&amounts)?;
        debug!(lower = bounds.lower, upper = bounds.upper, "outlier bounds");

        let clean_records: Vec<TransactionRecord> = records
            .into_iter()
            .filter(|r| bounds.contains(r.amount))
            .collect();
        let outliers_removed = total_records - clean_records.len();

        let (start, end) = match (clean_records.first(), clean_records.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => {
                return Err(ForecastError::Schema(
                    "Every row was flagged as an outlier".to_string(),
                ))
            }
        };

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in &clean_records {
            *totals.entry(record.date).or_insert(0.0) += record.amount;
        }
        let series = HistoricalSeries::from_daily_totals(totals);

        let report = IngestionReport {
            message: "Data uploaded successfully".to_string(),
            total_records,
            outliers_removed,
            clean_records: clean_records.len(),
            daily_records: series.len(),
            date_range: DateSpan { start, end },
        };

        Ok(Self {
            clean_records,
            series,
            report,
        })
    }

    pub fn clean_records(&self) -> &[TransactionRecord] {
        &self.clean_records
    }

    pub fn series(&self) -> &HistoricalSeries {
        &self.series
    }

    pub fn report(&self) -> &IngestionReport {
        &self.report
    }

    /// Split into the cleaned rows, the series and the report
    pub fn into_parts(self) -> (Vec<TransactionRecord>, HistoricalSeries, IngestionReport) {
        (self.clean_records, self.series, self.report)
    }
}

/// Data loader for transaction data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load and clean transactions from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<CleanedDataset> {
        let contents = fs::read(path)?;
        Self::from_bytes(&contents)
    }

    /// Load and clean transactions from raw CSV bytes
    pub fn from_bytes(contents: &[u8]) -> Result<CleanedDataset> {
        let records = Self::parse_records(contents)?;
        let dataset = CleanedDataset::from_records(records)?;

        let report = dataset.report();
        info!(
            total = report.total_records,
            outliers = report.outliers_removed,
            daily = report.daily_records,
            start = %report.date_range.start,
            end = %report.date_range.end,
            "ingested transactions"
        );

        Ok(dataset)
    }

    /// Parse every row, failing on the first bad date or amount
    pub fn parse_records(contents: &[u8]) -> Result<Vec<TransactionRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(contents);

        let headers = reader.headers()?.clone();
        let date_idx = Self::find_column(&headers, &DATE_COLUMNS)?;
        let amount_idx = Self::find_column(&headers, &AMOUNT_COLUMNS)?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            // Header is line 1
            let line = idx + 2;

            let raw_date = row.get(date_idx).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                ForecastError::Schema(format!(
                    "Unparseable transaction date '{}' on line {}",
                    raw_date, line
                ))
            })?;

            let raw_amount = row.get(amount_idx).unwrap_or_default();
            let amount = raw_amount
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ForecastError::Schema(format!(
                        "Unparseable amount '{}' on line {}",
                        raw_amount, line
                    ))
                })?;

            records.push(TransactionRecord { date, amount });
        }

        Ok(records)
    }

    /// Locate a required column by any of its accepted names
    fn find_column(headers: &csv::StringRecord, accepted: &[&str]) -> Result<usize> {
        headers
            .iter()
            .position(|name| {
                let normalized = normalize_header(name);
                accepted.iter().any(|a| normalize_header(a) == normalized)
            })
            .ok_or_else(|| {
                ForecastError::Schema(format!(
                    "CSV must contain a '{}' column (found: {})",
                    accepted[0],
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
    }
}

/// Lowercase, strip a BOM and treat `_`/`-`/whitespace runs as one space
fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
