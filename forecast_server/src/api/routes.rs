use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

/// Create the API router with all endpoints
///
/// # Routes
///
/// - `GET /` - Service description
/// - `GET /health` - Liveness and readiness flags
/// - `POST /upload-data/upload-data` - Multipart CSV upload (field `file`)
/// - `POST /train-model/train-model` - Train on the uploaded data
/// - `POST /forecast/forecast` - Forecast a date range (`?format=json` for data)
/// - `POST /compare/forecast-comparison` - Same-month comparison across years
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .route("/upload-data/upload-data", post(handlers::upload_data))
        .route("/train-model/train-model", post(handlers::train_model))
        .route("/forecast/forecast", post(handlers::forecast))
        .route(
            "/compare/forecast-comparison",
            post(handlers::forecast_comparison),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
