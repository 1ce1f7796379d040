//! Response DTOs for operations.
//!
//! Each response type contains all the data produced by an operation,
//! making it easy to consume from CLI, REST API, or programmatically.

use serde::{Deserialize, Serialize};
use typeslot_core::{HintCandidate, InferData};

/// Response from a stub operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubResponse {
    pub stub: String,
}

/// Response from an infer operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferResponse {
    /// Key the predictions were stored under.
    pub path: String,

    /// Session the prediction service assigned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    pub function_count: usize,

    pub variable_count: usize,

    /// The transformed predictions.
    pub data: InferData,
}

/// Response from a hints operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub path: String,

    /// Candidates in rank order.
    pub candidates: Vec<HintCandidate>,
}

/// Response from an accept operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptResponse {
    /// Whether the report was delivered.
    pub submitted: bool,
}

/// Response from a status operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Active predictor adapter.
    pub predictor: String,

    /// Files with stored predictions, sorted.
    pub files: Vec<String>,

    pub filter_predictions: bool,

    pub share_accepted_predictions: bool,
}
