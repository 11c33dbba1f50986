//! API invoker trait

use async_trait::async_trait;

use super::request::{ApiRequest, ApiResponse};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Executes an HTTP call described by a resolved payload
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiInvoker: Send + Sync {
    async fn invoke(&self, request: ApiRequest) -> Result<ApiResponse, DomainError>;
}
