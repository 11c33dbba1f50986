//! Input envelope for a single workflow resolution

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// Request data for resolving and running a workflow
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowData {
    /// The user's free-text request
    #[serde(default)]
    text: String,

    /// Location of the OpenAPI document (absolute URL or local path)
    #[serde(rename = "swagger_url", default)]
    swagger_src: String,

    /// Headers forwarded verbatim to every API call
    #[serde(default)]
    headers: HashMap<String, String>,

    /// Base URL for payload paths that are not absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_base_url: Option<String>,
}

impl WorkflowData {
    pub fn new(text: impl Into<String>, swagger_src: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            swagger_src: swagger_src.into(),
            headers: HashMap::new(),
            server_base_url: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_server_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.server_base_url = Some(base_url.into());
        self
    }

    /// Replace the specification source, e.g. after resolving it against a shared folder
    pub fn with_swagger_src(mut self, swagger_src: impl Into<String>) -> Self {
        self.swagger_src = swagger_src.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn swagger_src(&self) -> &str {
        &self.swagger_src
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn server_base_url(&self) -> Option<&str> {
        self.server_base_url.as_deref()
    }

    /// Reject requests without usable text
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.text.trim().is_empty() {
            return Err(WorkflowError::validation("text is required"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_request_body() {
        let data: WorkflowData = serde_json::from_value(json!({
            "text": "create a ticket",
            "swagger_url": "https://api.example.com/openapi.json",
            "headers": {"Authorization": "Bearer abc"},
            "server_base_url": "https://api.example.com"
        }))
        .unwrap();

        assert_eq!(data.text(), "create a ticket");
        assert_eq!(data.swagger_src(), "https://api.example.com/openapi.json");
        assert_eq!(
            data.headers().get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(data.server_base_url(), Some("https://api.example.com"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let data: WorkflowData = serde_json::from_value(json!({"text": "hi"})).unwrap();

        assert!(data.headers().is_empty());
        assert!(data.server_base_url().is_none());
        assert_eq!(data.swagger_src(), "");
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        assert!(WorkflowData::new("", "spec.json").validate().is_err());
        assert!(WorkflowData::new("   ", "spec.json").validate().is_err());
        assert!(WorkflowData::new("list pets", "spec.json").validate().is_ok());
    }
}
