use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::openapi::{OperationSpec, SpecLoader};
use crate::domain::payload::{ApiPayload, PayloadError, PayloadGenerator};

const SYSTEM_PROMPT: &str = "You fill in the parameters of a single REST API call. \
Reply with one JSON object with the keys \"path_params\", \"query_params\" and \"body\". \
Use values from the user's request and from the previous API response when they are relevant. \
Omit parameters you cannot determine. Use null for \"body\" when the operation takes none.";

/// Maximum number of characters of the previous response passed to the model
const MAX_CONTEXT_CHARS: usize = 8_000;

/// Generates payloads by asking a chat model to fill an operation's parameters
pub struct LlmPayloadGenerator {
    loader: Arc<dyn SpecLoader>,
    llm: Arc<dyn LlmProvider>,
}

impl LlmPayloadGenerator {
    pub fn new(loader: Arc<dyn SpecLoader>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { loader, llm }
    }

    fn build_request(operation: &OperationSpec, text: &str, prior_response: &str) -> LlmRequest {
        let operation_json = serde_json::to_string_pretty(operation).unwrap_or_default();

        let mut prompt = format!(
            "User request:\n{}\n\nOperation:\n{}\n",
            text, operation_json
        );

        if !prior_response.is_empty() {
            let context: String = prior_response.chars().take(MAX_CONTEXT_CHARS).collect();
            prompt.push_str(&format!("\nPrevious API response:\n{}\n", context));
        }

        LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(prompt)
            .temperature(0.0)
            .json()
            .build()
    }
}

#[async_trait]
impl PayloadGenerator for LlmPayloadGenerator {
    async fn generate(
        &self,
        spec_source: &str,
        text: &str,
        operation_id: &str,
        prior_response: &str,
    ) -> Result<ApiPayload, PayloadError> {
        let document = self
            .loader
            .load(spec_source)
            .await
            .map_err(|e| PayloadError::specification(e.to_string()))?;

        let operation = document
            .find_operation(operation_id)
            .ok_or_else(|| PayloadError::unknown_operation(operation_id))?;

        let request = Self::build_request(&operation, text, prior_response);
        let response = self
            .llm
            .chat(request)
            .await
            .map_err(|e| PayloadError::llm(e.to_string()))?;

        let filled: Value = serde_json::from_str(response.unfenced_content()).map_err(|e| {
            PayloadError::malformed(format!("model reply is not JSON: {}", e))
        })?;

        let Value::Object(mut filled) = filled else {
            return Err(PayloadError::malformed("model reply must be a JSON object"));
        };

        let body = match filled.remove("body") {
            Some(Value::Null) | None => None,
            Some(body) => Some(body),
        };

        debug!(
            operation_id = %operation_id,
            method = %operation.method,
            path = %operation.path,
            has_context = !prior_response.is_empty(),
            "Generated payload"
        );

        let mut payload = Map::new();
        payload.insert("method".to_string(), json!(operation.method.as_str()));
        payload.insert("endpoint".to_string(), json!(operation.path));
        payload.insert("path".to_string(), json!(operation.path));
        payload.insert(
            "path_params".to_string(),
            filled.remove("path_params").unwrap_or(Value::Null),
        );
        payload.insert(
            "query_params".to_string(),
            filled.remove("query_params").unwrap_or(Value::Null),
        );
        payload.insert("body_schema".to_string(), body.unwrap_or(Value::Null));
        payload.insert("servers".to_string(), json!(document.servers()));

        ApiPayload::from_value(Value::Object(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponse, MockLlmProvider};
    use crate::domain::openapi::{MockSpecLoader, OpenApiDocument};
    use crate::domain::payload::HttpMethod;
    use crate::domain::DomainError;

    fn document() -> Arc<OpenApiDocument> {
        Arc::new(OpenApiDocument::new(json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://api.example.com"}],
            "paths": {
                "/tickets": {"post": {"operationId": "create_ticket"}},
                "/tickets/{id}/status": {"get": {
                    "operationId": "get_ticket_status",
                    "parameters": [{"name": "id", "in": "path", "required": true}]
                }}
            }
        })))
    }

    fn loader() -> MockSpecLoader {
        let mut loader = MockSpecLoader::new();
        loader
            .expect_load()
            .withf(|source| source == "spec.json")
            .returning(|_| Ok(document()));
        loader
    }

    fn llm_replying(reply: &'static str) -> MockLlmProvider {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .times(1)
            .returning(move |_| Ok(LlmResponse::new("gpt", reply)));
        llm
    }

    #[tokio::test]
    async fn test_generate_first_step_payload() {
        let generator = LlmPayloadGenerator::new(
            Arc::new(loader()),
            Arc::new(llm_replying(
                r#"{"path_params": {}, "query_params": {}, "body": {"title": "Printer broken"}}"#,
            )),
        );

        let payload = generator
            .generate("spec.json", "create a ticket", "create_ticket", "")
            .await
            .unwrap();

        assert_eq!(payload.method, HttpMethod::POST);
        assert_eq!(payload.endpoint, "/tickets");
        assert_eq!(payload.path.as_deref(), Some("/tickets"));
        assert_eq!(payload.body_schema, Some(json!({"title": "Printer broken"})));
        assert_eq!(payload.servers, vec!["https://api.example.com"]);
    }

    #[tokio::test]
    async fn test_prior_response_reaches_the_prompt() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|request| {
                request.expects_json()
                    && request.messages[1].content.contains(r#"{"id": 42}"#)
            })
            .times(1)
            .returning(|_| {
                Ok(LlmResponse::new(
                    "gpt",
                    "```json\n{\"path_params\": {\"id\": 42}, \"body\": null}\n```",
                ))
            });

        let generator = LlmPayloadGenerator::new(Arc::new(loader()), Arc::new(llm));
        let payload = generator
            .generate("spec.json", "fetch its status", "get_ticket_status", r#"{"id": 42}"#)
            .await
            .unwrap();

        assert_eq!(payload.method, HttpMethod::GET);
        assert_eq!(payload.path_params.get("id"), Some(&json!(42)));
        assert!(payload.query_params.is_empty());
        assert!(payload.body_schema.is_none());
    }

    #[tokio::test]
    async fn test_first_step_prompt_has_no_context_section() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|request| !request.messages[1].content.contains("Previous API response"))
            .times(1)
            .returning(|_| Ok(LlmResponse::new("gpt", "{}")));

        let generator = LlmPayloadGenerator::new(Arc::new(loader()), Arc::new(llm));
        generator
            .generate("spec.json", "create", "create_ticket", "")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().never();

        let generator = LlmPayloadGenerator::new(Arc::new(loader()), Arc::new(llm));
        let err = generator
            .generate("spec.json", "delete it", "delete_ticket", "")
            .await
            .unwrap_err();

        assert_eq!(err, PayloadError::unknown_operation("delete_ticket"));
    }

    #[tokio::test]
    async fn test_malformed_model_reply() {
        let generator =
            LlmPayloadGenerator::new(Arc::new(loader()), Arc::new(llm_replying("not json")));

        let err = generator
            .generate("spec.json", "create", "create_ticket", "")
            .await
            .unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));

        let generator = LlmPayloadGenerator::new(
            Arc::new(loader()),
            Arc::new(llm_replying(r#"{"path_params": [1, 2]}"#)),
        );
        let err = generator
            .generate("spec.json", "create", "create_ticket", "")
            .await
            .unwrap_err();
        assert!(matches!(err, PayloadError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_spec_load_failure() {
        let mut loader = MockSpecLoader::new();
        loader
            .expect_load()
            .returning(|_| Err(DomainError::not_found("spec.json")));

        let generator =
            LlmPayloadGenerator::new(Arc::new(loader), Arc::new(MockLlmProvider::new()));
        let err = generator
            .generate("spec.json", "create", "create_ticket", "")
            .await
            .unwrap_err();

        assert!(matches!(err, PayloadError::Specification(_)));
    }

    #[tokio::test]
    async fn test_llm_failure() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .returning(|_| Err(DomainError::provider("openai", "timeout")));

        let generator = LlmPayloadGenerator::new(Arc::new(loader()), Arc::new(llm));
        let err = generator
            .generate("spec.json", "create", "create_ticket", "")
            .await
            .unwrap_err();

        assert!(matches!(err, PayloadError::Llm(_)));
    }
}
