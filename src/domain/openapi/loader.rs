//! Specification loader trait

use std::sync::Arc;

use async_trait::async_trait;

use super::document::OpenApiDocument;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Loads and parses an OpenAPI document from a URL or local path
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpecLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<Arc<OpenApiDocument>, DomainError>;
}
