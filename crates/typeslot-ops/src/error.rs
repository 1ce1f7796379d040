//! Error types for the operations layer.

use std::path::PathBuf;

use thiserror::Error;
use typeslot_core::{PredictionError, StubError};

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Caller supplied an argument the operation cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Prediction was requested for an empty source file.
    #[error("Cannot infer type annotations for empty files.")]
    EmptySource,

    /// Source exceeds the configured size limit.
    #[error("Source is {size} bytes (max {max} bytes)")]
    SourceTooLarge { size: usize, max: usize },

    /// The prediction service answered without predictions.
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    /// The prediction service could not be reached or answered garbage.
    #[error("Predictor error: {0}")]
    Predictor(String),

    /// No inference data stored for the path.
    #[error("No type predictions for {path}. Run infer first.")]
    NotInferred { path: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fixture file could not be loaded.
    #[error("Failed to load fixture {path}: {message}")]
    Fixture { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            OpsError::InvalidArgument(_) => "INVALID_ARGUMENT",
            OpsError::EmptySource => "EMPTY_SOURCE",
            OpsError::SourceTooLarge { .. } => "SOURCE_TOO_LARGE",
            OpsError::Prediction(_) | OpsError::Predictor(_) => "PREDICTION_FAILED",
            OpsError::NotInferred { .. } => "NOT_INFERRED",
            OpsError::Io(_) => "IO_ERROR",
            OpsError::Json(_) => "JSON_ERROR",
            OpsError::Fixture { .. } => "FIXTURE_ERROR",
            OpsError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<StubError> for OpsError {
    fn from(err: StubError) -> Self {
        OpsError::InvalidArgument(err.to_string())
    }
}

impl From<reqwest::Error> for OpsError {
    fn from(err: reqwest::Error) -> Self {
        OpsError::Predictor(err.to_string())
    }
}
