use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::api_call::{ApiInvoker, ApiRequest, ApiResponse};
use crate::domain::payload::HttpMethod;
use crate::domain::DomainError;

/// Sends resolved API requests with reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestApiInvoker {
    client: reqwest::Client,
}

impl ReqwestApiInvoker {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Invoker whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

/// Replace `{name}` placeholders with percent-encoded path parameter values
fn substitute_path_params(url: &str, params: &Map<String, Value>) -> String {
    params.iter().fold(url.to_string(), |url, (name, value)| {
        let segment = param_to_string(value);
        url.replace(&format!("{{{}}}", name), &urlencoding::encode(&segment))
    })
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl ApiInvoker for ReqwestApiInvoker {
    async fn invoke(&self, request: ApiRequest) -> Result<ApiResponse, DomainError> {
        let url = substitute_path_params(&request.url, &request.path_params);

        let query: Vec<(String, String)> = request
            .query_params
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.clone(), param_to_string(value)))
            .collect();

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .query(&query);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if request.method.allows_body() {
            if let Some(body) = &request.body_schema {
                builder = builder.json(body);
            }
        }

        debug!(method = %request.method, url = %url, "Invoking API");

        let response = builder
            .send()
            .await
            .map_err(|e| {
                DomainError::provider("api", format!("Request to {} failed: {}", url, e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::provider("api", format!("Failed to read response: {}", e)))?;

        debug!(url = %url, status, "API responded");

        Ok(ApiResponse::new(status, body))
    }
}
