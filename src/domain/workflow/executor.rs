//! Workflow executor trait

use async_trait::async_trait;

use super::data::WorkflowData;
use super::entity::WorkflowRecord;
use super::error::WorkflowError;

#[cfg(test)]
use mockall::automock;

/// Replays a recorded workflow against a live API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    /// Run every flow of `record` and return the serialized record info
    async fn execute(
        &self,
        record: &WorkflowRecord,
        data: &WorkflowData,
    ) -> Result<String, WorkflowError>;
}
