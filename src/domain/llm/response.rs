use serde::{Deserialize, Serialize};

/// Chat completion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub model: String,
    pub content: String,
}

impl LlmResponse {
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content with any surrounding markdown code fence removed
    pub fn unfenced_content(&self) -> &str {
        let trimmed = self.content.trim();

        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };

        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.strip_suffix("```").unwrap_or(rest).trim()
    }
}
