//! Inference endpoints.
//!
//! Sources arrive either as a raw text body or as the first file of a
//! multipart upload. Either way the predictions are stored in the context
//! under the given path.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::info;
use typeslot_ops::InferRequest;

use super::PathQuery;
use crate::types::{error_response, ok, ops_error, ApiState};

/// Name used when an uploaded file part has an empty file name.
const DEFAULT_UPLOAD_NAME: &str = "upload.py";

/// POST /api/infer?path=... - Infer a raw source body.
///
/// The body must be UTF-8; anything else is rejected with `INVALID_SOURCE`.
pub async fn infer_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PathQuery>,
    body: Bytes,
) -> Response {
    let source = match String::from_utf8(body.to_vec()) {
        Ok(source) => source,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "INVALID_SOURCE",
                format!("Source is not valid UTF-8: {}", e.utf8_error()),
            )
        }
    };

    match state.ctx.infer(InferRequest::new(query.path, source)).await {
        Ok(response) => ok(response),
        Err(e) => ops_error(e),
    }
}

/// POST /api/upload - Infer the first file of a multipart upload.
///
/// Non-file fields are skipped.
pub async fn upload_handler(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, "INVALID_MULTIPART", e.body_text())
            }
        };

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let path = if file_name.is_empty() {
            DEFAULT_UPLOAD_NAME.to_string()
        } else {
            file_name
        };

        let source = match field.text().await {
            Ok(source) => source,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, "INVALID_MULTIPART", e.body_text())
            }
        };

        info!(path = %path, bytes = source.len(), "Received upload");
        return match state.ctx.infer(InferRequest::new(path, source)).await {
            Ok(response) => ok(response),
            Err(e) => ops_error(e),
        };
    }

    error_response(
        StatusCode::BAD_REQUEST,
        "NO_FILE",
        "Upload contained no file part",
    )
}

/// GET /api/inferred?path=... - Stored predictions for a file.
pub async fn inferred_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PathQuery>,
) -> Response {
    match state.ctx.inferred(&query.path).await {
        Ok(data) => ok(data),
        Err(e) => ops_error(e),
    }
}
