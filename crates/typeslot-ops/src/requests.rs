//! Request DTOs for operations.
//!
//! Each request type encapsulates all the parameters needed for an operation,
//! making it easy to call from CLI, REST API, or programmatically.

use serde::{Deserialize, Serialize};
use typeslot_core::{AcceptedType, PARAM_HINT_TRIGGER};

pub use typeslot_core::StubRequest;

/// Request to predict types for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferRequest {
    /// Key the predictions are stored under (usually the file path).
    pub path: String,

    /// Full source text.
    pub source: String,
}

impl InferRequest {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Request for hint candidates at a cursor position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintRequest {
    /// Key the file's predictions are stored under.
    pub path: String,

    /// Current document text.
    pub text: String,

    /// 0-based cursor line.
    pub line: usize,

    /// 0-based cursor column just after the trigger character, in UTF-16
    /// code units as editors report it.
    pub character: usize,

    /// The character just typed.
    #[serde(default = "default_trigger")]
    pub trigger: char,
}

fn default_trigger() -> char {
    PARAM_HINT_TRIGGER
}

impl HintRequest {
    /// Create a hint request triggered by `:`.
    pub fn new(path: impl Into<String>, text: impl Into<String>, line: usize, character: usize) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            line,
            character,
            trigger: PARAM_HINT_TRIGGER,
        }
    }

    /// Use a different trigger character.
    pub fn with_trigger(mut self, trigger: char) -> Self {
        self.trigger = trigger;
        self
    }
}

/// Request to report an accepted or dismissed prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptRequest {
    /// Key of the file the prediction belongs to.
    pub path: String,

    #[serde(flatten)]
    pub accepted: AcceptedType,
}

impl AcceptRequest {
    pub fn new(path: impl Into<String>, accepted: AcceptedType) -> Self {
        Self {
            path: path.into(),
            accepted,
        }
    }
}
