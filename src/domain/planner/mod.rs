//! Dynamic planning fallback capability

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Plans and runs API calls directly from the specification when no recorded
/// workflow matches the request
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DynamicPlanner: Send + Sync {
    async fn plan_and_run(
        &self,
        spec_source: &str,
        text: &str,
        headers: &HashMap<String, String>,
    ) -> Result<Value, DomainError>;
}
