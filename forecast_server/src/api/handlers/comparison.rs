use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_forecast::chart::comparison_chart;
use sales_forecast::comparison::compare;
use sales_forecast::ComparisonRequest;
use std::sync::Arc;

use super::OutputFormat;
use crate::api::extract::ApiJson;
use crate::error::Result;
use crate::state::AppState;

/// Compare one month across years, as a downloadable chart
///
/// `?format=json` returns the series and summaries instead.
pub async fn forecast_comparison(
    State(state): State<Arc<AppState>>,
    Query(format): Query<OutputFormat>,
    ApiJson(request): ApiJson<ComparisonRequest>,
) -> Result<Response> {
    request.validate()?;
    let output = compare(&*state.context.read().await, &request)?;

    if format.is_json() {
        return Ok(Json(output).into_response());
    }

    let html = comparison_chart(&output).to_html();
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"forecast_comparison.html\"",
            ),
        ],
        html,
    )
        .into_response())
}
