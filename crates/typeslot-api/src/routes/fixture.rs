//! Sample fixture endpoint.

use axum::Json;
use typeslot_core::{sample_fixtures, PredictionFixture};

use crate::types::ApiResponse;

/// GET /api/fixture - Sample prediction records for client testing.
pub async fn fixture_handler() -> Json<ApiResponse<Vec<PredictionFixture>>> {
    Json(ApiResponse::new(sample_fixtures()))
}
