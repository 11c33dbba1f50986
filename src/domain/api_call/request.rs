//! Request and response types exchanged with the API invoker

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::domain::payload::{ApiPayload, HttpMethod};

/// A resolved HTTP call ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Absolute URL; may still contain `{name}` path placeholders
    pub url: String,
    pub endpoint: String,
    pub path_params: Map<String, Value>,
    pub query_params: Map<String, Value>,
    pub body_schema: Option<Value>,
    pub headers: HashMap<String, String>,
    pub servers: Vec<String>,
}

impl ApiRequest {
    /// Build a request from a generated payload and its resolved URL
    pub fn from_payload(
        payload: ApiPayload,
        url: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method: payload.method,
            url: url.into(),
            endpoint: payload.endpoint,
            path_params: payload.path_params,
            query_params: payload.query_params,
            body_schema: payload.body_schema,
            headers,
            servers: payload.servers,
        }
    }
}

/// Raw response from an invoked API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
