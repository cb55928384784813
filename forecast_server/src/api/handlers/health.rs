use axum::extract::State;
use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// Service description
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "Sales Forecasting API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "/upload-data/upload-data",
            "train": "/train-model/train-model",
            "forecast": "/forecast/forecast",
            "compare": "/compare/forecast-comparison",
            "health": "/health",
        },
    }))
}

/// Liveness plus whether data is loaded and a model is trained
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let context = state.context.read().await;
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "forecast-server",
            "data_loaded": context.has_data(),
            "model_trained": context.is_trained(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState::new(Config::default()).unwrap());
        let (status, body) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0["status"], "healthy");
        assert_eq!(body.0["data_loaded"], false);
        assert_eq!(body.0["model_trained"], false);
    }
}
