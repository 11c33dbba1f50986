//! Workflow repository trait

use async_trait::async_trait;

use super::entity::{WorkflowId, WorkflowRecord};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read access to persisted workflow records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Get a workflow by ID
    async fn get(&self, id: &WorkflowId) -> Result<Option<WorkflowRecord>, DomainError>;

    /// List all workflows
    async fn list(&self) -> Result<Vec<WorkflowRecord>, DomainError>;

    /// Store a new workflow record
    async fn create(&self, record: WorkflowRecord) -> Result<WorkflowRecord, DomainError>;

    /// Number of stored workflows
    async fn count(&self) -> Result<usize, DomainError>;
}
