//! API types and DTOs.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use typeslot_ops::{OpsError, TypeslotContext};

/// Shared application state for the API.
pub struct ApiState {
    /// The operations context.
    pub ctx: TypeslotContext,
}

/// Response wrapper with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    /// Create a new API response with current timestamp.
    pub fn new(data: T) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { data, timestamp }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Number of files with stored predictions.
    pub files: usize,
    /// Active predictor adapter.
    pub predictor: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// 200 with the enveloped payload.
pub(crate) fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
}

/// Enveloped error body with an explicit status.
pub(crate) fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse::new(ErrorBody {
            code: code.to_string(),
            message: message.into(),
        })),
    )
        .into_response()
}

/// HTTP status for an operations error.
pub(crate) fn status_for(err: &OpsError) -> StatusCode {
    match err {
        OpsError::InvalidArgument(_) | OpsError::EmptySource => StatusCode::BAD_REQUEST,
        OpsError::SourceTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        OpsError::Prediction(_) | OpsError::Predictor(_) => StatusCode::BAD_GATEWAY,
        OpsError::NotInferred { .. } => StatusCode::NOT_FOUND,
        OpsError::Io(_) | OpsError::Json(_) | OpsError::Fixture { .. } | OpsError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Map an operations error to its enveloped error response.
pub(crate) fn ops_error(err: OpsError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(code = err.code(), "{}", err);
    } else {
        warn!(code = err.code(), "{}", err);
    }
    error_response(status, err.code(), err.to_string())
}
