//! Intent classification capability

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Decides whether a request asks for one thing or several
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn has_multiple_intents(&self, text: &str) -> Result<bool, DomainError>;
}
