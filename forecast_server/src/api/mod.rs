//! HTTP API for the forecasting service

pub mod extract;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
