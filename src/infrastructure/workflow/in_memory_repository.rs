//! In-memory workflow repository implementation

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::workflow::{WorkflowId, WorkflowRecord, WorkflowRepository};
use crate::domain::DomainError;

/// In-memory implementation of WorkflowRepository
#[derive(Debug, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<HashMap<WorkflowId, WorkflowRecord>>>,
}

impl InMemoryWorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with workflows
    pub fn with_workflows(workflows: Vec<WorkflowRecord>) -> Self {
        let map: HashMap<WorkflowId, WorkflowRecord> = workflows
            .into_iter()
            .map(|w| (w.id().clone(), w))
            .collect();

        Self {
            workflows: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a JSON array of workflow records
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read workflow seed file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let records: Vec<WorkflowRecord> = serde_json::from_str(&content).map_err(|e| {
            DomainError::configuration(format!(
                "Invalid workflow seed file '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!(path = %path.display(), count = records.len(), "Loaded workflow seed file");

        Ok(Self::with_workflows(records))
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn get(&self, id: &WorkflowId) -> Result<Option<WorkflowRecord>, DomainError> {
        let workflows = self.workflows.read().await;
        Ok(workflows.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<WorkflowRecord>, DomainError> {
        let workflows = self.workflows.read().await;
        let mut records: Vec<WorkflowRecord> = workflows.values().cloned().collect();
        records.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        Ok(records)
    }

    async fn create(&self, record: WorkflowRecord) -> Result<WorkflowRecord, DomainError> {
        let mut workflows = self.workflows.write().await;

        if workflows.contains_key(record.id()) {
            return Err(DomainError::conflict(format!(
                "Workflow '{}' already exists",
                record.id()
            )));
        }

        workflows.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.workflows.read().await.len())
    }
}
