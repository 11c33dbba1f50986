//! Accumulated per-operation results of a workflow replay

use serde::Serialize;
use serde_json::{Map, Value};

/// Key holding the workflow's name in the aggregated result
pub const WORKFLOW_NAME_KEY: &str = "Workflow Name";

/// Ordered map of `operation_id -> parsed response`, headed by the workflow name
///
/// Owned by a single executor run; keys keep insertion order so the
/// serialized form lists operations in the order they ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordInfo(Map<String, Value>);

impl RecordInfo {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(WORKFLOW_NAME_KEY.to_string(), Value::String(workflow_name.into()));
        Self(map)
    }

    /// Record the parsed response of an operation
    pub fn insert(&mut self, operation_id: impl Into<String>, response: Value) {
        self.0.insert(operation_id.into(), response);
    }

    pub fn get(&self, operation_id: &str) -> Option<&Value> {
        self.0.get(operation_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of distinct operations recorded, excluding the workflow name
    pub fn operation_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Serialize to the JSON string returned on the replay path
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
