//! Typed API call payload

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::PayloadError;

/// HTTP request method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    /// All methods that may appear as keys of an OpenAPI path item
    pub const ALL: [HttpMethod; 7] = [
        Self::GET,
        Self::POST,
        Self::PUT,
        Self::DELETE,
        Self::PATCH,
        Self::HEAD,
        Self::OPTIONS,
    ];

    /// Parse a method name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::GET),
            "POST" => Some(Self::POST),
            "PUT" => Some(Self::PUT),
            "DELETE" => Some(Self::DELETE),
            "PATCH" => Some(Self::PATCH),
            "HEAD" => Some(Self::HEAD),
            "OPTIONS" => Some(Self::OPTIONS),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::PATCH => "PATCH",
            Self::HEAD => "HEAD",
            Self::OPTIONS => "OPTIONS",
        }
    }

    /// Lowercase form used as a key in OpenAPI path items
    pub fn openapi_key(&self) -> &'static str {
        match self {
            Self::GET => "get",
            Self::POST => "post",
            Self::PUT => "put",
            Self::DELETE => "delete",
            Self::PATCH => "patch",
            Self::HEAD => "head",
            Self::OPTIONS => "options",
        }
    }

    /// Whether a request body is sent for this method
    pub fn allows_body(&self) -> bool {
        matches!(self, Self::POST | Self::PUT | Self::PATCH | Self::DELETE)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully described HTTP call for one workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPayload {
    pub method: HttpMethod,

    /// Operation path template as declared in the specification
    pub endpoint: String,

    /// Path to call; may be relative until resolved against a base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    pub path_params: Map<String, Value>,

    #[serde(default)]
    pub query_params: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_schema: Option<Value>,

    /// Candidate base URLs declared by the specification
    #[serde(default)]
    pub servers: Vec<String>,
}

impl ApiPayload {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            method,
            path: Some(endpoint.clone()),
            endpoint,
            path_params: Map::new(),
            query_params: Map::new(),
            body_schema: None,
            servers: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn without_path(mut self) -> Self {
        self.path = None;
        self
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.path_params.insert(name.into(), value);
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.query_params.insert(name.into(), value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body_schema = Some(body);
        self
    }

    pub fn with_servers(mut self, servers: Vec<String>) -> Self {
        self.servers = servers;
        self
    }

    /// Validate an untyped payload at the generator boundary
    ///
    /// `method` is required, `endpoint` falls back to `path`, and `path`
    /// itself stays optional so URL resolution can report it as missing.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut object) = value else {
            return Err(PayloadError::malformed("payload must be a JSON object"));
        };

        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| PayloadError::malformed("missing 'method'"))?;
        let method = HttpMethod::parse(method)
            .ok_or_else(|| PayloadError::malformed(format!("unsupported method '{}'", method)))?;

        let path = match object.remove("path") {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) => Some(path),
            Some(other) => {
                return Err(PayloadError::malformed(format!(
                    "'path' must be a string, got {}",
                    other
                )));
            }
        };

        let endpoint = match object.remove("endpoint") {
            Some(Value::String(endpoint)) => endpoint,
            _ => path
                .clone()
                .ok_or_else(|| PayloadError::malformed("missing 'endpoint'"))?,
        };

        let path_params = take_object(&mut object, "path_params")?;
        let query_params = take_object(&mut object, "query_params")?;

        let body_schema = match object.remove("body_schema") {
            None | Some(Value::Null) => None,
            Some(body) => Some(body),
        };

        let servers = match object.remove("servers") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(url) => Some(url),
                    Value::Object(mut server) => match server.remove("url") {
                        Some(Value::String(url)) => Some(url),
                        _ => None,
                    },
                    _ => None,
                })
                .collect(),
            Some(other) => {
                return Err(PayloadError::malformed(format!(
                    "'servers' must be an array, got {}",
                    other
                )));
            }
        };

        Ok(Self {
            method,
            endpoint,
            path,
            path_params,
            query_params,
            body_schema,
            servers,
        })
    }
}

fn take_object(
    object: &mut Map<String, Value>,
    key: &str,
) -> Result<Map<String, Value>, PayloadError> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(PayloadError::malformed(format!(
            "'{}' must be an object, got {}",
            key, other
        ))),
    }
}
