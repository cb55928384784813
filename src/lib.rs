//! # Sales Forecast Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`series_math`]: quantiles, summary statistics, Fourier terms, ridge
//!   regression and exponential smoothing
//! - [`sales_forecast`]: ingestion, training, forecasting and comparison
//! - [`forecast_server`]: the HTTP service
//!
//! See `demos/offline_forecast.rs` for a run without the HTTP layer.

pub use forecast_server;
pub use sales_forecast;
pub use series_math;
