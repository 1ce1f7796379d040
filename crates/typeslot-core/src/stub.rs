//! Function signature stubs.
//!
//! A stub is a function declaration with its body elided, e.g.
//! `def merge(a, b: int) -> int: ...`. The formatter is
//! permissive: names and type expressions are inserted verbatim, so partially
//! inferred signatures still render.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infer::FunctionInferData;

/// Errors raised by the outer surfaces that build stubs from user input.
///
/// [`format_stub`] itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubError {
    /// The function name was empty.
    #[error("function name must not be empty")]
    EmptyName,

    /// A parameter spec had no name before the `:` separator.
    #[error("invalid parameter spec '{0}': missing parameter name")]
    MissingParameterName(String),
}

/// A single parameter of a stub: its name and optional type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name, emitted verbatim.
    pub name: String,
    /// Type annotation; `None` or an empty string emits the bare name.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ParameterDescriptor {
    /// Parameter without an annotation.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    /// Parameter annotated with `type_name`.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }
}

impl<'a, N: Into<String>> From<(N, Option<&'a str>)> for ParameterDescriptor {
    fn from((name, type_name): (N, Option<&'a str>)) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
        }
    }
}

/// Parses `name` or `name:type`. Only the first `:` separates, so
/// `cb:Callable[[int], str]` keeps its brackets intact.
impl FromStr for ParameterDescriptor {
    type Err = StubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, type_name) = match s.split_once(':') {
            Some((name, type_name)) => {
                let type_name = type_name.trim();
                (
                    name.trim(),
                    (!type_name.is_empty()).then(|| type_name.to_string()),
                )
            }
            None => (s.trim(), None),
        };

        if name.is_empty() {
            return Err(StubError::MissingParameterName(s.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            type_name,
        })
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(type_name) = annotation(self.type_name.as_deref()) {
            write!(f, ": {}", type_name)?;
        }
        Ok(())
    }
}

/// Everything needed to render one stub.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StubRequest {
    /// Function name.
    pub name: String,
    /// Parameters in emission order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Return type annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl StubRequest {
    /// Create a request with no parameters and no return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the return type.
    pub fn returning(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Build a request from inference data, annotating every slot with its
    /// top-ranked candidate.
    pub fn from_function(function: &FunctionInferData) -> Self {
        Self {
            name: function.name.clone(),
            parameters: function
                .params
                .iter()
                .map(|(name, candidates)| ParameterDescriptor {
                    name: name.clone(),
                    type_name: candidates.first().cloned(),
                })
                .collect(),
            return_type: function.return_types.first().cloned(),
        }
    }

    /// Reject requests whose name is empty.
    ///
    /// This is the only check outer surfaces apply; the formatter accepts
    /// anything.
    pub fn validate(&self) -> Result<(), StubError> {
        if self.name.is_empty() {
            return Err(StubError::EmptyName);
        }
        Ok(())
    }

    /// Render the stub text.
    pub fn render(&self) -> String {
        format_stub(&self.name, &self.parameters, self.return_type.as_deref())
    }
}

impl fmt::Display for StubRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Format a function stub such as `def f(a, b: int) -> int: ...`.
///
/// Missing or empty annotations are omitted. An empty `name` yields
/// `def (): ...`; callers that need a valid name use
/// [`StubRequest::validate`].
pub fn format_stub(
    name: &str,
    parameters: &[ParameterDescriptor],
    return_type: Option<&str>,
) -> String {
    let mut stub = String::with_capacity(16 + name.len() + parameters.len() * 12);
    stub.push_str("def ");
    stub.push_str(name);
    stub.push('(');

    for (i, parameter) in parameters.iter().enumerate() {
        if i > 0 {
            stub.push_str(", ");
        }
        stub.push_str(&parameter.name);
        if let Some(type_name) = annotation(parameter.type_name.as_deref()) {
            stub.push_str(": ");
            stub.push_str(type_name);
        }
    }

    stub.push(')');

    if let Some(return_type) = annotation(return_type) {
        stub.push_str(" -> ");
        stub.push_str(return_type);
    }

    stub.push_str(": ...");
    stub
}

/// Empty annotations count as absent.
fn annotation(type_name: Option<&str>) -> Option<&str> {
    type_name.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn params(items: &[(&str, Option<&str>)]) -> Vec<ParameterDescriptor> {
        items.iter().map(|&(n, t)| (n, t).into()).collect()
    }

    #[test]
    fn test_no_parameters() {
        assert_eq!(format_stub("f", &[], None), "def f(): ...");
        assert_eq!(format_stub("f", &[], Some("int")), "def f() -> int: ...");
    }

    #[test]
    fn test_untyped_parameter_has_no_colon() {
        assert_eq!(
            format_stub("f", &params(&[("x", None)]), None),
            "def f(x): ..."
        );
    }

    #[test]
    fn test_typed_parameter() {
        assert_eq!(
            format_stub("f", &params(&[("x", Some("int"))]), None),
            "def f(x: int): ..."
        );
    }

    #[test]
    fn test_mixed_parameters_comma_placement() {
        assert_eq!(
            format_stub("f", &params(&[("a", None), ("b", Some("int"))]), Some("int")),
            "def f(a, b: int) -> int: ..."
        );
        assert_eq!(
            format_stub("f", &params(&[("a", Some("str")), ("b", None)]), None),
            "def f(a: str, b): ..."
        );
    }

    #[test]
    fn test_mixed_typed_and_untyped() {
        assert_eq!(
            format_stub(
                "test_func",
                &params(&[("name", None), ("value", Some("int"))]),
                Some("int")
            ),
            "def test_func(name, value: int) -> int: ..."
        );
    }

    #[test]
    fn test_empty_annotations_are_absent() {
        assert_eq!(
            format_stub("f", &params(&[("x", Some(""))]), Some("")),
            "def f(x): ..."
        );
    }

    #[test]
    fn test_empty_name_is_rendered_verbatim() {
        assert_eq!(format_stub("", &[], None), "def (): ...");
        assert_eq!(StubRequest::new("").validate(), Err(StubError::EmptyName));
    }

    #[test]
    fn test_types_are_not_validated() {
        assert_eq!(
            format_stub("g", &params(&[("cb", Some("Callable[[int], "))]), Some("->")),
            "def g(cb: Callable[[int], ) -> ->: ..."
        );
    }

    #[test]
    fn test_deterministic() {
        let p = params(&[("a", Some("int")), ("b", None), ("c", Some("List[str]"))]);
        let first = format_stub("h", &p, Some("bool"));
        for _ in 0..10 {
            assert_eq!(format_stub("h", &p, Some("bool")), first);
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let forward = params(&[("a", Some("int")), ("b", None), ("c", Some("str"))]);
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(format_stub("f", &forward, None), "def f(a: int, b, c: str): ...");
        assert_eq!(format_stub("f", &reversed, None), "def f(c: str, b, a: int): ...");
    }

    #[test]
    fn test_request_builder_and_display() {
        let request = StubRequest::new("add")
            .with_parameter(ParameterDescriptor::typed("x", "int"))
            .with_parameter(ParameterDescriptor::untyped("y"))
            .returning("int");

        assert_eq!(request.render(), "def add(x: int, y) -> int: ...");
        assert_eq!(request.to_string(), request.render());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_parameter_from_str() {
        assert_eq!(
            "x".parse::<ParameterDescriptor>().unwrap(),
            ParameterDescriptor::untyped("x")
        );
        assert_eq!(
            " x : int ".parse::<ParameterDescriptor>().unwrap(),
            ParameterDescriptor::typed("x", "int")
        );
        assert_eq!(
            "d:Dict[str, int]".parse::<ParameterDescriptor>().unwrap(),
            ParameterDescriptor::typed("d", "Dict[str, int]")
        );
        assert_eq!(
            "x:".parse::<ParameterDescriptor>().unwrap(),
            ParameterDescriptor::untyped("x")
        );
        assert!(matches!(
            ":int".parse::<ParameterDescriptor>(),
            Err(StubError::MissingParameterName(_))
        ));
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"name":"f","parameters":[{"name":"a"},{"name":"b","type":"int"}],"return_type":"int"}"#;
        let request: StubRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.render(), "def f(a, b: int) -> int: ...");

        let minimal: StubRequest = serde_json::from_str(r#"{"name":"g"}"#).unwrap();
        assert_eq!(minimal.render(), "def g(): ...");
    }

    #[test]
    fn test_from_function_uses_top_candidates() {
        let mut params = IndexMap::new();
        params.insert("self".to_string(), vec![]);
        params.insert("x".to_string(), vec!["int".to_string(), "float".to_string()]);
        let function = FunctionInferData {
            name: "scale".to_string(),
            lines: (3, 5),
            return_types: vec!["float".to_string(), "int".to_string()],
            params,
        };

        assert_eq!(
            StubRequest::from_function(&function).render(),
            "def scale(self, x: int) -> float: ..."
        );
    }
}
