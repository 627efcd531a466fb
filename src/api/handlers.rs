//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, PlanResponse, PriceQuery};
use crate::runner::HourRecord;

/// `GET /plan` → 200 + `PlanResponse` JSON
pub async fn get_plan(State(state): State<Arc<AppState>>) -> Json<PlanResponse> {
    Json(PlanResponse::from(&state.plan))
}

/// Returns hourly records, optionally filtered by hour range.
///
/// `GET /prices` → 200 + `Vec<HourRecord>` JSON
/// `GET /prices?from=N&to=M` → filtered range (inclusive)
/// `GET /prices?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<HourRecord> = state
        .plan
        .hours()
        .into_iter()
        .filter(|h| h.hour >= from && h.hour <= to)
        .collect();

    Ok(Json(records))
}
