//! Payload generation errors

use thiserror::Error;

/// Failures at the payload generator boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayloadError {
    /// The operation ID does not exist in the specification
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Specification unavailable: {0}")]
    Specification(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl PayloadError {
    pub fn unknown_operation(operation_id: impl Into<String>) -> Self {
        Self::UnknownOperation(operation_id.into())
    }

    pub fn specification(message: impl Into<String>) -> Self {
        Self::Specification(message.into())
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_operation_is_distinguishable() {
        let err = PayloadError::unknown_operation("delete_everything");
        assert!(matches!(err, PayloadError::UnknownOperation(ref id) if id == "delete_everything"));
        assert_eq!(err.to_string(), "Unknown operation 'delete_everything'");
    }
}
