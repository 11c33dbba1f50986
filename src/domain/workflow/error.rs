//! Workflow error types

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while resolving or replaying a workflow
///
/// Lookup failures never appear here: the resolver converts them into a
/// fallback to the dynamic planner.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File not found: {0}")]
    SpecNotFound(String),

    #[error("Specification unavailable: {0}")]
    SpecUnavailable(String),

    #[error("URL resolution failed in flow {flow_index} at '{operation_id}': {message}")]
    Resolution {
        flow_index: usize,
        operation_id: String,
        message: String,
    },

    #[error("Payload generation failed in flow {flow_index} at '{operation_id}': {message}")]
    Generation {
        flow_index: usize,
        operation_id: String,
        message: String,
    },

    #[error("API invocation failed in flow {flow_index} at '{operation_id}': {message}")]
    Invocation {
        flow_index: usize,
        operation_id: String,
        message: String,
    },

    #[error("Dynamic planner failed: {0}")]
    Planner(String),

    #[error("Answer generation failed: {0}")]
    Answer(String),

    #[error("{error} (partial result: {partial})")]
    Partial {
        error: Box<WorkflowError>,
        partial: String,
    },
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Map a spec loader failure: a missing local file is `SpecNotFound`,
    /// anything else (HTTP status, parse error, timeout) is `SpecUnavailable`
    pub fn from_spec_load(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::SpecNotFound(message),
            DomainError::Provider { message, .. } => Self::SpecUnavailable(message),
            other => Self::SpecUnavailable(other.to_string()),
        }
    }

    pub fn resolution(
        flow_index: usize,
        operation_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            flow_index,
            operation_id: operation_id.into(),
            message: message.into(),
        }
    }

    pub fn generation(
        flow_index: usize,
        operation_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Generation {
            flow_index,
            operation_id: operation_id.into(),
            message: message.into(),
        }
    }

    pub fn invocation(
        flow_index: usize,
        operation_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Invocation {
            flow_index,
            operation_id: operation_id.into(),
            message: message.into(),
        }
    }

    pub fn planner(message: impl Into<String>) -> Self {
        Self::Planner(message.into())
    }

    pub fn answer(message: impl Into<String>) -> Self {
        Self::Answer(message.into())
    }

    /// Wrap a step failure together with the results gathered before it
    pub fn partial(error: WorkflowError, partial: impl Into<String>) -> Self {
        Self::Partial {
            error: Box::new(error),
            partial: partial.into(),
        }
    }

    /// Operation that failed, when the error is tied to a single step
    pub fn operation_id(&self) -> Option<&str> {
        match self {
            Self::Resolution { operation_id, .. }
            | Self::Generation { operation_id, .. }
            | Self::Invocation { operation_id, .. } => Some(operation_id),
            Self::Partial { error, .. } => error.operation_id(),
            _ => None,
        }
    }
}
