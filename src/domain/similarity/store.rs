//! Similarity store trait

use async_trait::async_trait;

use super::document::{SimilarDocument, SimilarityMatch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Namespaced text index searchable by semantic similarity
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SimilarityStore: Send + Sync {
    /// Return up to `limit` matches for `query`, best first
    async fn search(
        &self,
        namespace: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarityMatch>, DomainError>;

    /// Index a document in `namespace`
    async fn add(&self, namespace: &str, document: SimilarDocument) -> Result<(), DomainError>;
}
