//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{DispatchQuery, DispatchRecord, ErrorResponse, ResultResponse};

/// Returns capacities, cost, KPIs and the options of the run.
///
/// `GET /result` → 200 + `ResultResponse` JSON
pub async fn get_result(State(state): State<Arc<AppState>>) -> Json<ResultResponse> {
    let r = &state.result;
    Json(ResultResponse {
        capacity: r.capacity,
        cost: r.cost,
        feasibility_margin: r.feasibility_margin,
        generations: r.generations,
        termination: r.termination,
        kpis: r.kpis.clone(),
        options: state.options.clone(),
        solver: state.solver.clone(),
    })
}

/// Returns dispatch records, optionally filtered by hour range.
///
/// `GET /dispatch` → 200 + `Vec<DispatchRecord>` JSON
/// `GET /dispatch?from=N&to=M` → filtered range (inclusive)
/// `GET /dispatch?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_dispatch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DispatchQuery>,
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

    let end = to.saturating_add(1).min(state.result.hours());
    let records: Vec<DispatchRecord> = (from..end)
        .map(|t| DispatchRecord::at(&state.result, t))
        .collect();

    Ok(Json(records))
}
