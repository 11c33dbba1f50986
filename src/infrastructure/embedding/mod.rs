//! Embedding provider implementations

mod openai;

pub use openai::OpenAiEmbeddingProvider;

pub use super::llm::{HttpClient, HttpClientTrait};
