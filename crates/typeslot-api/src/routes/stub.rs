//! Stub endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use tracing::debug;
use typeslot_ops::StubRequest;

use super::PathQuery;
use crate::types::{ok, ops_error, ApiState};

/// POST /api/stub - Render a stub from a name, parameters and return type.
pub async fn stub_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<StubRequest>,
) -> Response {
    debug!(name = %request.name, params = request.parameters.len(), "Stub request");

    match state.ctx.stub(request) {
        Ok(response) => ok(response),
        Err(e) => ops_error(e),
    }
}

/// GET /api/stubs?path=... - One stub per predicted function.
pub async fn stubs_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PathQuery>,
) -> Response {
    match state.ctx.stubs(&query.path).await {
        Ok(stubs) => ok(stubs),
        Err(e) => ops_error(e),
    }
}
