use axum::extract::State;
use axum::Json;
use sales_forecast::TrainingReport;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Fit a new model on the current series and make it active
pub async fn train_model(State(state): State<Arc<AppState>>) -> Result<Json<TrainingReport>> {
    let series = state.context.read().await.series().clone();
    let trainer = state.trainer.clone();

    let (model, report) = tokio::task::spawn_blocking(move || trainer.fit_snapshot(&series))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    state.context.write().await.install_model(model);
    Ok(Json(report))
}
