//! Text embedding capability used by the similarity store

mod provider;

pub use provider::{cosine_similarity, EmbeddingProvider};

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
