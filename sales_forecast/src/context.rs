//! Shared forecasting state

use crate::data::{CleanedDataset, HistoricalSeries, IngestionReport, TransactionRecord};
use crate::error::{ForecastError, Result};
use crate::models::TrainedForecastModel;
use std::sync::Arc;

/// The historical series, the cleaned rows and the active model
///
/// Callers own the context and decide how it is shared. The HTTP server
/// keeps one behind a read/write lock.
#[derive(Debug, Default)]
pub struct ForecastContext {
    series: HistoricalSeries,
    clean_records: Vec<TransactionRecord>,
    model: Option<Arc<dyn TrainedForecastModel>>,
}

impl ForecastContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series and cleaned rows with a freshly ingested dataset
    ///
    /// The active model is kept.
    pub fn load(&mut self, dataset: CleanedDataset) -> IngestionReport {
        let (clean_records, series, report) = dataset.into_parts();
        self.clean_records = clean_records;
        self.series = series;
        report
    }

    pub fn series(&self) -> &HistoricalSeries {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut HistoricalSeries {
        &mut self.series
    }

    pub fn clean_records(&self) -> &[TransactionRecord] {
        &self.clean_records
    }

    /// The active model, or `NotReady` before the first successful training
    pub fn active_model(&self) -> Result<Arc<dyn TrainedForecastModel>> {
        self.model.clone().ok_or_else(|| {
            ForecastError::NotReady("Model not trained. Please train model first.".to_string())
        })
    }

    /// Make `model` the active model, replacing any previous one
    pub fn install_model(&mut self, model: Arc<dyn TrainedForecastModel>) {
        self.model = Some(model);
    }

    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}
