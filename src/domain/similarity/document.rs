//! Indexed documents and search matches

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key linking an indexed document to its workflow record
pub const WORKFLOW_ID_METADATA_KEY: &str = "workflow_id";

/// A text document stored in the similarity index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarDocument {
    id: String,
    content: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl SimilarDocument {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Document pointing at a stored workflow
    pub fn for_workflow(
        id: impl Into<String>,
        content: impl Into<String>,
        workflow_id: impl Into<String>,
    ) -> Self {
        Self::new(id, content)
            .with_metadata(WORKFLOW_ID_METADATA_KEY, Value::String(workflow_id.into()))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// The `workflow_id` metadata entry, if present and a string
    pub fn workflow_id(&self) -> Option<&str> {
        self.metadata
            .get(WORKFLOW_ID_METADATA_KEY)
            .and_then(Value::as_str)
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub document: SimilarDocument,
    /// Similarity score in [0, 1], higher is more similar
    pub score: f32,
}

impl SimilarityMatch {
    pub fn new(document: SimilarDocument, score: f32) -> Self {
        Self { document, score }
    }
}
