//! Error responses for the HTTP API

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_forecast::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// Malformed request that never reached the forecasting core
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A background task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Forecast(err) if err.is_client_error() => (StatusCode::BAD_REQUEST, err.kind()),
            ApiError::Forecast(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.kind()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!(error = %self, kind, "request failed");
        } else {
            tracing::warn!(error = %self, kind, "request rejected");
        }

        let body = Json(serde_json::json!({
            "error": kind,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
