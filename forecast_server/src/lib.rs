//! HTTP service for sales forecasting.
//!
//! Wraps the `sales_forecast` library: one shared [`ForecastContext`] behind a
//! read/write lock, with endpoints to upload transactions, train a model,
//! forecast a date range and compare a month across years.
//!
//! [`ForecastContext`]: sales_forecast::ForecastContext

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::create_router;
pub use config::{Config, ModelKind};
pub use error::ApiError;
pub use state::AppState;
