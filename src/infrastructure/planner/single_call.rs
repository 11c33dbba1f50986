use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::api_call::{ApiInvoker, ApiRequest};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::openapi::{OpenApiDocument, SpecLoader};
use crate::domain::payload::{is_absolute_url, resolve_url, PayloadGenerator};
use crate::domain::planner::DynamicPlanner;
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "You match a user's request to one operation of a REST API. \
Reply with a JSON object {\"operation_id\": \"<id>\"} naming the best operation. \
If no operation fits, reply {\"operation_id\": null, \"message\": \"<short explanation>\"}.";

const NO_MATCH_MESSAGE: &str = "No API operation matches the request";

#[derive(Debug, Deserialize)]
struct OperationChoice {
    operation_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Picks a single operation with the model, then generates and sends its call
pub struct SingleCallPlanner {
    loader: Arc<dyn SpecLoader>,
    llm: Arc<dyn LlmProvider>,
    generator: Arc<dyn PayloadGenerator>,
    invoker: Arc<dyn ApiInvoker>,
}

impl SingleCallPlanner {
    pub fn new(
        loader: Arc<dyn SpecLoader>,
        llm: Arc<dyn LlmProvider>,
        generator: Arc<dyn PayloadGenerator>,
        invoker: Arc<dyn ApiInvoker>,
    ) -> Self {
        Self {
            loader,
            llm,
            generator,
            invoker,
        }
    }

    fn catalog(document: &OpenApiDocument) -> String {
        document
            .operations()
            .iter()
            .map(|op| match &op.summary {
                Some(summary) => format!(
                    "- {}: {} {} ({})",
                    op.operation_id, op.method, op.path, summary
                ),
                None => format!("- {}: {} {}", op.operation_id, op.method, op.path),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn choose_operation(
        &self,
        document: &OpenApiDocument,
        text: &str,
    ) -> Result<OperationChoice, DomainError> {
        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(format!(
                "Operations:\n{}\n\nUser request:\n{}",
                Self::catalog(document),
                text
            ))
            .temperature(0.0)
            .json()
            .build();

        let response = self.llm.chat(request).await?;

        serde_json::from_str(response.unfenced_content()).map_err(|e| {
            DomainError::provider(
                self.llm.provider_name(),
                format!("Invalid operation choice: {}", e),
            )
        })
    }
}

#[async_trait]
impl DynamicPlanner for SingleCallPlanner {
    async fn plan_and_run(
        &self,
        spec_source: &str,
        text: &str,
        headers: &HashMap<String, String>,
    ) -> Result<Value, DomainError> {
        let document = self.loader.load(spec_source).await?;

        let choice = self.choose_operation(&document, text).await?;
        let operation_id = match choice.operation_id {
            Some(id) if document.find_operation(&id).is_some() => id,
            _ => {
                info!("No operation matched the request");
                let message = choice.message.unwrap_or_else(|| NO_MATCH_MESSAGE.to_string());
                return Ok(json!({ "message": message }));
            }
        };

        debug!(operation_id = %operation_id, "Planner selected operation");

        let payload = self
            .generator
            .generate(spec_source, text, &operation_id, "")
            .await
            .map_err(|e| DomainError::provider("planner", e.to_string()))?;

        let servers = document.servers();
        let base_url = servers.iter().find(|s| is_absolute_url(s)).map(String::as_str);
        let url = resolve_url(&payload, base_url)
            .map_err(|e| DomainError::validation(format!("{} for '{}'", e, operation_id)))?;

        let response = self
            .invoker
            .invoke(ApiRequest::from_payload(payload, url, headers.clone()))
            .await?;

        Ok(response.json().unwrap_or(Value::String(response.body)))
    }
}
