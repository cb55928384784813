use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use sales_forecast::chart::forecast_chart;
use sales_forecast::forecast::{backfill, generate};
use sales_forecast::ForecastRequest;
use std::sync::Arc;

use super::OutputFormat;
use crate::api::extract::ApiJson;
use crate::error::Result;
use crate::state::AppState;

/// Forecast a date range, back-fill the series and return a chart
///
/// `?format=json` returns the rows and summary instead.
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(format): Query<OutputFormat>,
    ApiJson(request): ApiJson<ForecastRequest>,
) -> Result<Response> {
    let model = state.context.read().await.active_model()?;
    let (start, end) = request.date_range()?;

    let output = generate(model.as_ref(), start, end, request.include_uncertainty)?;

    backfill(state.context.write().await.series_mut(), &output);

    if format.is_json() {
        return Ok(Json(output).into_response());
    }

    let title = format!(
        "Sales Forecast: {} to {}",
        request.start_date, request.end_date
    );
    Ok(Html(forecast_chart(&output, &title).to_html()).into_response())
}
