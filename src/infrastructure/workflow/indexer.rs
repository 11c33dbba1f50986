//! Indexes stored workflows into the similarity store

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::similarity::{SimilarDocument, SimilarityStore};
use crate::domain::workflow::{WorkflowRecord, WorkflowRepository};
use crate::domain::DomainError;

/// Makes recorded workflows discoverable by similarity search
pub struct WorkflowIndexer {
    store: Arc<dyn SimilarityStore>,
    namespace: String,
}

impl WorkflowIndexer {
    pub fn new(store: Arc<dyn SimilarityStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Index one workflow under its own ID
    pub async fn index(&self, record: &WorkflowRecord) -> Result<(), DomainError> {
        let document = SimilarDocument::for_workflow(
            record.id().as_str(),
            record.index_text(),
            record.id().as_str(),
        );

        debug!(workflow_id = %record.id(), namespace = %self.namespace, "Indexing workflow");
        self.store.add(&self.namespace, document).await
    }

    /// Index every workflow in the repository; returns how many were indexed
    pub async fn index_all(
        &self,
        repository: &dyn WorkflowRepository,
    ) -> Result<usize, DomainError> {
        let records = repository.list().await?;

        for record in &records {
            self.index(record).await?;
        }

        info!(count = records.len(), namespace = %self.namespace, "Indexed workflows");
        Ok(records.len())
    }
}
