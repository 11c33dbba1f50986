//! Application state for shared services

use std::sync::Arc;

use crate::domain::WorkflowRepository;
use crate::infrastructure::services::HandleService;
use crate::infrastructure::workflow::WorkflowResolver;

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<WorkflowResolver>,
    pub handler: Arc<HandleService>,
    pub repository: Arc<dyn WorkflowRepository>,
    /// Prefix for specification sources that are not `https://` URLs
    pub shared_folder: String,
}

impl AppState {
    pub fn new(
        resolver: Arc<WorkflowResolver>,
        handler: Arc<HandleService>,
        repository: Arc<dyn WorkflowRepository>,
        shared_folder: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            handler,
            repository,
            shared_folder: shared_folder.into(),
        }
    }
}
