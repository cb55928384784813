//! # Sales Forecast
//!
//! A Rust library for forecasting daily sales from uploaded transactions.
//!
//! ## Features
//!
//! - CSV ingestion with outlier removal and per-day aggregation
//! - Seasonal regression (trend, yearly/weekly/monthly cycles) and an
//!   exponential smoothing baseline behind one model interface
//! - Training on a fixed boundary split with MAE, RMSE and MAPE on held-out days
//! - Range forecasts with prediction intervals, back-filled into the history
//! - Same-month comparisons across years
//! - Standalone Plotly HTML charts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::{DataLoader, ForecastContext, ForecastRequest, Trainer};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let mut context = ForecastContext::new();
//! context.load(DataLoader::from_csv("transactions.csv")?);
//!
//! let report = Trainer::default().train(&mut context)?;
//! println!("MAE {:.2}, RMSE {:.2}", report.mae, report.rmse);
//!
//! let request = ForecastRequest::new("2024-01-01", "2024-01-31");
//! let output = sales_forecast::forecast::forecast(&mut context, &request)?;
//! println!("Total: {:.2}", output.summary.total_forecast);
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod comparison;
pub mod context;
pub mod data;
pub mod error;
pub mod forecast;
pub mod lifecycle;
pub mod metrics;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::comparison::{ComparisonOutput, ComparisonRequest};
pub use crate::context::ForecastContext;
pub use crate::data::{CleanedDataset, DataLoader, HistoricalSeries, IngestionReport, Provenance};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{ForecastOutput, ForecastRequest};
pub use crate::lifecycle::{Trainer, TrainingConfig, TrainingReport};
pub use crate::models::{ForecastModel, ForecastRow, ModelSpec, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
