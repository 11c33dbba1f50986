use async_trait::async_trait;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Chat completion backend (OpenAI or any compatible endpoint)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    fn provider_name(&self) -> &'static str;
}
