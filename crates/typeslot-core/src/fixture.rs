//! Compact prediction fixtures.
//!
//! A fixture describes one function's predictions by its first line:
//! `{"line": 4, "return_types": ["int"], "params": {"x": ["any"]}}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::infer::FunctionInferData;

/// Predicted return and parameter types anchored at a source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionFixture {
    pub line: u32,
    pub return_types: Vec<String>,
    pub params: IndexMap<String, Vec<String>>,
}

impl From<&FunctionInferData> for PredictionFixture {
    fn from(function: &FunctionInferData) -> Self {
        Self {
            line: function.lines.0,
            return_types: function.return_types.clone(),
            params: function.params.clone(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The reference fixture used by tests and `typeslot fixture`.
pub fn sample_fixtures() -> Vec<PredictionFixture> {
    vec![
        PredictionFixture {
            line: 1,
            return_types: strings(&["int", "typing.Dict", "str", "any"]),
            params: IndexMap::from([("a".to_string(), strings(&["str", "any"]))]),
        },
        PredictionFixture {
            line: 4,
            return_types: strings(&["int"]),
            params: IndexMap::from([
                ("x".to_string(), strings(&["any"])),
                ("y".to_string(), strings(&["typing.List", "any"])),
            ]),
        },
    ]
}

/// Serialize fixtures as a single-line JSON array.
pub fn fixtures_to_json(fixtures: &[PredictionFixture]) -> serde_json::Result<String> {
    serde_json::to_string(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_shape() {
        let json = fixtures_to_json(&sample_fixtures()).unwrap();
        assert_eq!(
            json,
            r#"[{"line":1,"return_types":["int","typing.Dict","str","any"],"params":{"a":["str","any"]}},{"line":4,"return_types":["int"],"params":{"x":["any"],"y":["typing.List","any"]}}]"#
        );
    }

    #[test]
    fn test_parse_back() {
        let json = fixtures_to_json(&sample_fixtures()).unwrap();
        let parsed: Vec<PredictionFixture> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1].params["y"], ["typing.List", "any"]);
    }

    #[test]
    fn test_from_function() {
        let function = FunctionInferData {
            name: "f".into(),
            lines: (7, 9),
            return_types: vec!["str".into()],
            params: IndexMap::from([("p".to_string(), vec!["int".to_string()])]),
        };
        let fixture = PredictionFixture::from(&function);
        assert_eq!(fixture.line, 7);
        assert_eq!(fixture.return_types, ["str"]);
        assert_eq!(fixture.params["p"], ["int"]);
    }
}
