use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::intent::IntentClassifier;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "You decide whether a user's request asks for a single action \
or for several actions that must run one after another. \
Reply with a JSON object {\"multiple_intents\": true} or {\"multiple_intents\": false}.";

#[derive(Debug, Deserialize)]
struct Verdict {
    multiple_intents: bool,
}

/// Classifies requests with a single JSON-mode chat call
pub struct LlmIntentClassifier {
    llm: Arc<dyn LlmProvider>,
}

impl LlmIntentClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn has_multiple_intents(&self, text: &str) -> Result<bool, DomainError> {
        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(text)
            .temperature(0.0)
            .json()
            .build();

        let response = self.llm.chat(request).await?;
        let verdict: Verdict = serde_json::from_str(response.unfenced_content()).map_err(|e| {
            DomainError::provider(
                self.llm.provider_name(),
                format!("Invalid intent verdict: {}", e),
            )
        })?;

        debug!(multiple_intents = verdict.multiple_intents, "Classified request");
        Ok(verdict.multiple_intents)
    }
}
