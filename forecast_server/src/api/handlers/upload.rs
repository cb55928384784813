use axum::extract::State;
use axum::Json;
use sales_forecast::{DataLoader, ForecastError, IngestionReport};
use std::sync::Arc;

use crate::api::extract::ApiMultipart;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

/// Replace the historical series with an uploaded CSV
pub async fn upload_data(
    State(state): State<Arc<AppState>>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<IngestionReport>> {
    let mut contents = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
            contents = Some(bytes);
            break;
        }
    }

    let contents = contents.ok_or_else(|| {
        ForecastError::Schema(format!("Multipart field '{}' is missing", FILE_FIELD))
    })?;

    // Parse outside the lock
    let dataset = tokio::task::spawn_blocking(move || DataLoader::from_bytes(&contents))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    let report = state.context.write().await.load(dataset);
    Ok(Json(report))
}
