//! Payload generator trait

use async_trait::async_trait;

use super::entity::ApiPayload;
use super::error::PayloadError;

#[cfg(test)]
use mockall::automock;

/// Produces the API call for one operation from intent text and prior context
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PayloadGenerator: Send + Sync {
    /// Generate a payload for `operation_id`
    ///
    /// `prior_response` is the raw body returned by the previous step in the
    /// same flow, or an empty string for the first step.
    async fn generate(
        &self,
        spec_source: &str,
        text: &str,
        operation_id: &str,
        prior_response: &str,
    ) -> Result<ApiPayload, PayloadError>;
}
