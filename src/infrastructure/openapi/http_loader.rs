use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::domain::openapi::{OpenApiDocument, SpecLoader};
use crate::domain::payload::is_absolute_url;
use crate::domain::DomainError;

const DEFAULT_TTL: Duration = Duration::from_secs(300);
const DEFAULT_CAPACITY: u64 = 64;

/// Prefix non-`https://` sources with the shared folder
///
/// Plain `http://` URLs are prefixed as well; only `https://` is treated as
/// remote.
pub fn normalize_swagger_source(source: &str, shared_folder: &str) -> String {
    if source.starts_with("https://") {
        source.to_string()
    } else {
        format!("{}{}", shared_folder, source)
    }
}

/// Loads OpenAPI documents over HTTP(S) or from disk, caching parsed results
#[derive(Debug)]
pub struct HttpSpecLoader {
    client: reqwest::Client,
    cache: Cache<String, Arc<OpenApiDocument>>,
}

impl HttpSpecLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_cache(client, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    pub fn with_cache(client: reqwest::Client, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();

        Self { client, cache }
    }

    /// Number of cached documents
    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }

    async fn fetch(&self, source: &str) -> Result<String, DomainError> {
        if is_absolute_url(source) {
            let response = self.client.get(source).send().await.map_err(|e| {
                DomainError::provider("openapi", format!("Failed to fetch Swagger content: {}", e))
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(DomainError::provider(
                    "openapi",
                    format!("Failed to fetch Swagger content: HTTP {}", status),
                ));
            }

            return response.text().await.map_err(|e| {
                DomainError::provider("openapi", format!("Failed to read Swagger content: {}", e))
            });
        }

        tokio::fs::read_to_string(source).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DomainError::not_found(source),
            _ => DomainError::internal(format!("Failed to read '{}': {}", source, e)),
        })
    }
}

#[async_trait]
impl SpecLoader for HttpSpecLoader {
    async fn load(&self, source: &str) -> Result<Arc<OpenApiDocument>, DomainError> {
        if let Some(cached) = self.cache.get(source).await {
            debug!(source = %source, "Spec cache hit");
            return Ok(cached);
        }

        debug!(source = %source, "Spec cache miss, loading");

        let text = self.fetch(source).await?;
        let document = Arc::new(OpenApiDocument::parse(&text)?);
        self.cache
            .insert(source.to_string(), Arc::clone(&document))
            .await;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::domain::WorkflowError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SPEC: &str = r#"{
        "openapi": "3.0.0",
        "servers": [{"url": "https://api.example.com"}],
        "paths": {"/tickets": {"post": {"operationId": "create_ticket"}}}
    }"#;

    #[test]
    fn test_normalize_swagger_source() {
        assert_eq!(
            normalize_swagger_source("https://x/spec.json", "/app/shared_data/"),
            "https://x/spec.json"
        );
        assert_eq!(
            normalize_swagger_source("tickets.yaml", "/app/shared_data/"),
            "/app/shared_data/tickets.yaml"
        );
        assert_eq!(
            normalize_swagger_source("http://x/spec.json", "/app/shared_data/"),
            "/app/shared_data/http://x/spec.json"
        );
    }

    #[tokio::test]
    async fn test_load_over_http_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spec.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPEC))
            .expect(1)
            .mount(&server)
            .await;

        let loader = HttpSpecLoader::new(reqwest::Client::new());
        let source = format!("{}/spec.json", server.uri());

        let first = loader.load(&source).await.unwrap();
        let second = loader.load(&source).await.unwrap();

        assert!(first.find_operation("create_ticket").is_some());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let loader = HttpSpecLoader::new(reqwest::Client::new());
        let err = loader
            .load(&format!("{}/missing.json", server.uri()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to fetch Swagger content"));
    }

    #[tokio::test]
    async fn test_load_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SPEC.as_bytes()).unwrap();

        let loader = HttpSpecLoader::new(reqwest::Client::new());
        let document = loader.load(file.path().to_str().unwrap()).await.unwrap();

        assert_eq!(document.servers(), vec!["https://api.example.com"]);
    }

    #[tokio::test]
    async fn test_load_missing_local_file() {
        let loader = HttpSpecLoader::new(reqwest::Client::new());
        let err = loader.load("/definitely/not/here.json").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(
            WorkflowError::from_spec_load(err).to_string(),
            "File not found: /definitely/not/here.json"
        );
    }

    #[tokio::test]
    async fn test_load_invalid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"openapi\": \"3.0.0\"}").unwrap();

        let loader = HttpSpecLoader::new(reqwest::Client::new());
        let err = loader.load(file.path().to_str().unwrap()).await.unwrap_err();

        assert!(matches!(err, DomainError::Specification { .. }));
    }
}
