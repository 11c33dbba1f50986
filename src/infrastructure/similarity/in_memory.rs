//! In-memory similarity store

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::embedding::{cosine_similarity, EmbeddingProvider};
use crate::domain::similarity::{SimilarDocument, SimilarityMatch, SimilarityStore};
use crate::domain::DomainError;

struct IndexedDocument {
    document: SimilarDocument,
    embedding: Vec<f32>,
}

/// Namespaced similarity store using linear cosine search
///
/// Suitable for the handful of recorded workflows a deployment carries.
pub struct InMemorySimilarityStore {
    embedder: Arc<dyn EmbeddingProvider>,
    namespaces: RwLock<HashMap<String, Vec<IndexedDocument>>>,
}

impl InMemorySimilarityStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents indexed in `namespace`
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl SimilarityStore for InMemorySimilarityStore {
    async fn search(
        &self,
        namespace: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarityMatch>, DomainError> {
        let query_embedding = self.embedder.embed(query).await?;

        let namespaces = self.namespaces.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let Some(documents) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<SimilarityMatch> = documents
            .iter()
            .map(|indexed| {
                let score = cosine_similarity(&query_embedding, &indexed.embedding).clamp(0.0, 1.0);
                SimilarityMatch::new(indexed.document.clone(), score)
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);

        Ok(matches)
    }

    async fn add(&self, namespace: &str, document: SimilarDocument) -> Result<(), DomainError> {
        let embedding = self.embedder.embed(document.content()).await?;

        let mut namespaces = self.namespaces.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let documents = namespaces.entry(namespace.to_string()).or_default();
        documents.retain(|indexed| indexed.document.id() != document.id());
        documents.push(IndexedDocument {
            document,
            embedding,
        });

        Ok(())
    }
}
