//! Similarity search domain
//!
//! Workflows are indexed by text and matched against incoming requests by
//! semantic similarity rather than exact keys.

mod document;
mod store;

pub use document::{SimilarDocument, SimilarityMatch, WORKFLOW_ID_METADATA_KEY};
pub use store::SimilarityStore;

#[cfg(test)]
pub use store::MockSimilarityStore;
