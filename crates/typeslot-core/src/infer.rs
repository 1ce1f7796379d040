//! Type prediction payloads and their extension-friendly form.
//!
//! The prediction service answers with a nested module/class/function
//! structure where every slot carries `(qualifier, confidence)` pairs. The
//! rest of the workspace works on [`InferData`], a flat list of functions and
//! variables with inclusive 1-based line ranges and ranked annotations.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Prediction service wire model
// =============================================================================

/// A single prediction: type qualifier and confidence in `[0, 1]`.
pub type ParamPrediction = (String, f64);

/// Predictions for one slot, best first.
pub type PredictionList = Vec<ParamPrediction>;

/// Slot name to its ordered predictions.
pub type PredictionMapping = IndexMap<String, PredictionList>;

/// Variable name to `[[first_line, col], [last_line, col]]`.
pub type VarLocations = HashMap<String, Vec<Vec<u32>>>;

/// Inclusive `(first, last)` 1-based line range.
pub type LineRange = (u32, u32);

/// A function as reported by the prediction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferApiFunction {
    pub name: String,
    /// `[[first_line, col], [last_line, col]]`.
    #[serde(default)]
    pub fn_lc: Vec<Vec<u32>>,
    /// Existing annotations in the source.
    #[serde(default)]
    pub params: IndexMap<String, String>,
    #[serde(default)]
    pub params_p: PredictionMapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret_type_p: Option<PredictionList>,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub variables_p: PredictionMapping,
    #[serde(default)]
    pub fn_var_ln: VarLocations,
}

/// A class as reported by the prediction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferApiClass {
    pub name: String,
    #[serde(default)]
    pub funcs: Vec<InferApiFunction>,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub variables_p: PredictionMapping,
    #[serde(default)]
    pub cls_var_ln: VarLocations,
}

/// Predictions for one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferApiData {
    #[serde(default)]
    pub funcs: Vec<InferApiFunction>,
    #[serde(default)]
    pub classes: Vec<InferApiClass>,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub variables_p: PredictionMapping,
    #[serde(default)]
    pub mod_var_ln: VarLocations,
    /// Session assigned by the service to this file.
    #[serde(default)]
    pub session_id: String,
}

/// Top-level response envelope of the prediction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferApiPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<InferApiData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Why a payload carried no predictions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// The service reported an error message.
    #[error("{0}")]
    Remote(String),

    /// Neither a response nor an error was present.
    #[error("The received response was empty.")]
    EmptyPayload,
}

impl InferApiPayload {
    /// Wrap a successful response.
    pub fn success(data: InferApiData) -> Self {
        Self {
            response: Some(data),
            error: None,
        }
    }

    /// Wrap a service-side error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(message.into()),
        }
    }

    /// Extract the response, turning a missing one into a [`PredictionError`].
    pub fn into_result(self) -> Result<InferApiData, PredictionError> {
        match (self.response, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(message)) => Err(PredictionError::Remote(message)),
            (None, None) => Err(PredictionError::EmptyPayload),
        }
    }
}

// =============================================================================
// Extension model
// =============================================================================

/// Ranked annotation candidates for one function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInferData {
    pub name: String,
    pub lines: LineRange,
    /// Best first.
    pub return_types: Vec<String>,
    /// Parameter name to candidates, best first, in signature order.
    pub params: IndexMap<String, Vec<String>>,
}

/// Ranked annotation candidates for one variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInferData {
    pub name: String,
    pub lines: LineRange,
    /// Best first.
    pub annotations: Vec<String>,
}

/// All inference data for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferData {
    pub functions: Vec<FunctionInferData>,
    pub variables: Vec<VariableInferData>,
}

impl InferData {
    /// First function whose range contains `line`.
    pub fn function_at(&self, line: u32) -> Option<&FunctionInferData> {
        self.functions
            .iter()
            .find(|f| is_within_line_bounds(line, f.lines))
    }

    /// First variable named `name` whose range contains `line`.
    pub fn variable_at(&self, line: u32, name: &str) -> Option<&VariableInferData> {
        self.variables
            .iter()
            .find(|v| v.name == name && is_within_line_bounds(line, v.lines))
    }
}

/// Return type offered when the service predicted none.
const NO_RETURN_TYPE: &str = "None";

/// Flatten a prediction response into [`InferData`].
///
/// Variables come out module first, then per class, then per function.
/// Functions come out module first, then per class.
pub fn transform_infer_api_data(api_data: &InferApiData) -> InferData {
    let mut variables =
        extract_variable_infer_data(&api_data.variables_p, &api_data.mod_var_ln);

    let mut funcs: Vec<&InferApiFunction> = api_data.funcs.iter().collect();
    for class in &api_data.classes {
        funcs.extend(class.funcs.iter());
        variables.extend(extract_variable_infer_data(
            &class.variables_p,
            &class.cls_var_ln,
        ));
    }

    let mut functions = Vec::with_capacity(funcs.len());
    for func in funcs {
        let return_types = match &func.ret_type_p {
            Some(predictions) => qualifiers(predictions),
            None => vec![NO_RETURN_TYPE.to_string()],
        };

        let params = func
            .params_p
            .iter()
            .map(|(name, predictions)| (name.clone(), qualifiers(predictions)))
            .collect();

        functions.push(FunctionInferData {
            name: func.name.clone(),
            lines: line_range(&func.fn_lc),
            return_types,
            params,
        });

        variables.extend(extract_variable_infer_data(
            &func.variables_p,
            &func.fn_var_ln,
        ));
    }

    InferData {
        functions,
        variables,
    }
}

/// Variables without a location entry are dropped.
fn extract_variable_infer_data(
    predictions: &PredictionMapping,
    locations: &VarLocations,
) -> Vec<VariableInferData> {
    predictions
        .iter()
        .filter_map(|(name, predictions)| {
            let location = locations.get(name)?;
            Some(VariableInferData {
                name: name.clone(),
                annotations: qualifiers(predictions),
                lines: line_range(location),
            })
        })
        .collect()
}

fn qualifiers(predictions: &PredictionList) -> Vec<String> {
    predictions.iter().map(|(q, _)| q.clone()).collect()
}

/// `[[first, _], [last, _]]` to `(first, last)`; anything shorter maps to `(0, 0)`.
fn line_range(location: &[Vec<u32>]) -> LineRange {
    let first = location.first().and_then(|p| p.first());
    let last = location.get(1).and_then(|p| p.first());
    match (first, last) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (0, 0),
    }
}

/// Whether `line` lies within `bounds`, both ends inclusive.
pub fn is_within_line_bounds(line: u32, bounds: LineRange) -> bool {
    line >= bounds.0 && line <= bounds.1
}
