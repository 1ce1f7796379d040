//! API route handlers.

mod fixture;
mod health;
mod hints;
mod infer;
mod stub;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use typeslot_ops::TypeslotContext;

use crate::types::ApiState;

/// Headroom above the source limit for multipart framing.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Query parameters naming a stored file.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// Key the predictions are stored under.
    pub path: String,
}

/// Create the API router with all endpoints.
pub fn create_api_router(ctx: TypeslotContext) -> Router {
    let body_limit = ctx.config.max_source_bytes().saturating_add(BODY_LIMIT_SLACK);
    let state = Arc::new(ApiState { ctx });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_handler))
        // Stubs
        .route("/stub", post(stub::stub_handler))
        .route("/stubs", get(stub::stubs_handler))
        // Inference
        .route("/upload", post(infer::upload_handler))
        .route("/infer", post(infer::infer_handler))
        .route("/inferred", get(infer::inferred_handler))
        // Hints and telemetry
        .route("/hints", post(hints::hints_handler))
        .route("/accept", post(hints::accept_handler))
        .route("/fixture", get(fixture::fixture_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
