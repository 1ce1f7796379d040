//! Core domain types shared across the typeslot workspace.
//!
//! Everything in this crate is pure data and pure functions: the signature
//! stub formatter, the wire model of the type-prediction service, the
//! per-file type store and the hint matching used to turn stored predictions
//! into ranked completion candidates.

pub mod fixture;
pub mod hints;
pub mod infer;
pub mod store;
pub mod stub;
pub mod telemetry;

pub use fixture::{fixtures_to_json, sample_fixtures, PredictionFixture};
pub use hints::{complete, Cursor, HintCandidate, TypeSlot, PARAM_HINT_TRIGGER, RETURN_HINT_TRIGGER};
pub use infer::{
    is_within_line_bounds, transform_infer_api_data, FunctionInferData, InferApiClass,
    InferApiData, InferApiFunction, InferApiPayload, InferData, LineRange, ParamPrediction,
    PredictionError, PredictionList, PredictionMapping, VarLocations, VariableInferData,
};
pub use store::TypeStore;
pub use stub::{format_stub, ParameterDescriptor, StubError, StubRequest};
pub use telemetry::AcceptedType;
