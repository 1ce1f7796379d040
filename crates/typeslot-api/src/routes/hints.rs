//! Hint and telemetry endpoints.

use std::sync::Arc;

use axum::{extract::State, response::Response, Json};
use typeslot_ops::{AcceptRequest, HintRequest};

use crate::types::{ok, ops_error, ApiState};

/// POST /api/hints - Candidates at a cursor position.
pub async fn hints_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<HintRequest>,
) -> Response {
    match state.ctx.hints(request).await {
        Ok(response) => ok(response),
        Err(e) => ops_error(e),
    }
}

/// POST /api/accept - Report an accepted or dismissed prediction.
pub async fn accept_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AcceptRequest>,
) -> Response {
    match state.ctx.accept(request).await {
        Ok(response) => ok(response),
        Err(e) => ops_error(e),
    }
}
