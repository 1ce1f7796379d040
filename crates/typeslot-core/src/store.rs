//! In-memory store of inference data keyed by file path.

use std::collections::HashMap;

use crate::infer::{FunctionInferData, InferData, VariableInferData};

/// Maps file paths to their most recent [`InferData`].
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    data: HashMap<String, InferData>,
}

impl TypeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the data for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: InferData) {
        self.data.insert(key.into(), value);
    }

    /// Data for `key`, if any was added.
    pub fn get(&self, key: &str) -> Option<&InferData> {
        self.data.get(key)
    }

    /// Remove and return the data for `key`.
    pub fn remove(&mut self, key: &str) -> Option<InferData> {
        self.data.remove(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Function of `key` whose range contains the 1-based `line`.
    pub fn function_at(&self, key: &str, line: u32) -> Option<&FunctionInferData> {
        self.get(key)?.function_at(line)
    }

    /// Variable `name` of `key` whose range contains the 1-based `line`.
    pub fn variable_at(&self, key: &str, line: u32, name: &str) -> Option<&VariableInferData> {
        self.get(key)?.variable_at(line, name)
    }
}
