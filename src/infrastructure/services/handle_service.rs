//! Single-entry request handling
//!
//! A request with several intents is resolved as a workflow. A single intent
//! gets one planned API call (best effort) and a chat answer built from the
//! caller's base prompt and whatever the call returned.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::intent::IntentClassifier;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::workflow::{WorkflowData, WorkflowError};
use crate::infrastructure::workflow::WorkflowResolver;

const ANSWER_FORMAT: &str = "Reply with one JSON object {\"bot_message\": \"<answer>\"}.";

/// Maximum number of characters of the API output passed to the model
const MAX_OUTPUT_CHARS: usize = 8_000;

pub struct HandleService {
    resolver: Arc<WorkflowResolver>,
    classifier: Arc<dyn IntentClassifier>,
    llm: Arc<dyn LlmProvider>,
}

impl HandleService {
    pub fn new(
        resolver: Arc<WorkflowResolver>,
        classifier: Arc<dyn IntentClassifier>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            resolver,
            classifier,
            llm,
        }
    }

    /// Answer a request, given an already normalized spec source
    pub async fn handle(
        &self,
        base_prompt: &str,
        data: &WorkflowData,
    ) -> Result<Value, WorkflowError> {
        if base_prompt.trim().is_empty() {
            return Err(WorkflowError::validation("base_prompt is required"));
        }
        data.validate()?;

        if self.has_multiple_intents(data.text()).await {
            info!("Request has multiple intents, resolving as a workflow");
            return Ok(self.resolver.resolve(data).await?.into_json());
        }

        self.resolver.check_spec(data.swagger_src()).await?;

        let api_output = match self.resolver.plan(data).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(error = %e, "Failed to call or map API endpoint");
                None
            }
        };

        self.answer(base_prompt, data.text(), api_output.as_ref()).await
    }

    async fn has_multiple_intents(&self, text: &str) -> bool {
        match self.classifier.has_multiple_intents(text).await {
            Ok(multiple) => multiple,
            Err(e) => {
                warn!(error = %e, "Intent classification failed, treating as a single intent");
                false
            }
        }
    }

    async fn answer(
        &self,
        base_prompt: &str,
        text: &str,
        api_output: Option<&Value>,
    ) -> Result<Value, WorkflowError> {
        let mut prompt = format!("Question:\n{}\n", text);
        if let Some(output) = api_output {
            let output: String = output.to_string().chars().take(MAX_OUTPUT_CHARS).collect();
            prompt.push_str(&format!("\nAPI response:\n{}\n", output));
        }

        let request = LlmRequest::builder()
            .system(format!("{}\n\n{}", base_prompt.trim(), ANSWER_FORMAT))
            .user(prompt)
            .temperature(0.0)
            .json()
            .build();

        let response = self
            .llm
            .chat(request)
            .await
            .map_err(|e| WorkflowError::answer(e.to_string()))?;

        match serde_json::from_str::<Value>(response.unfenced_content()) {
            Ok(Value::Object(answer)) => Ok(Value::Object(answer)),
            _ => Ok(json!({ "bot_message": response.content().trim() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::MockIntentClassifier;
    use crate::domain::llm::{LlmResponse, MockLlmProvider};
    use crate::domain::openapi::{MockSpecLoader, OpenApiDocument};
    use crate::domain::planner::MockDynamicPlanner;
    use crate::domain::similarity::MockSimilarityStore;
    use crate::domain::workflow::{MockWorkflowExecutor, MockWorkflowRepository};
    use crate::domain::DomainError;
    use crate::infrastructure::workflow::WorkflowResolverConfig;

    const BASE_PROMPT: &str = "You are the helpdesk assistant.";
    const TEXT: &str = "create a ticket for the broken printer";

    fn data() -> WorkflowData {
        WorkflowData::new(TEXT, "/app/shared_data/helpdesk.json")
    }

    fn classifier(multiple: bool) -> MockIntentClassifier {
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_has_multiple_intents()
            .withf(|text| text == TEXT)
            .times(1)
            .returning(move |_| Ok(multiple));
        classifier
    }

    fn loader_ok() -> MockSpecLoader {
        let mut loader = MockSpecLoader::new();
        loader
            .expect_load()
            .withf(|source| source == "/app/shared_data/helpdesk.json")
            .returning(|_| Ok(Arc::new(OpenApiDocument::new(json!({"paths": {}})))));
        loader
    }

    fn planner_returning(value: Value) -> MockDynamicPlanner {
        let mut planner = MockDynamicPlanner::new();
        planner
            .expect_plan_and_run()
            .times(1)
            .returning(move |_, _, _| Ok(value.clone()));
        planner
    }

    fn planner_failing() -> MockDynamicPlanner {
        let mut planner = MockDynamicPlanner::new();
        planner
            .expect_plan_and_run()
            .times(1)
            .returning(|_, _, _| Err(DomainError::provider("api", "HTTP 500")));
        planner
    }

    fn planner_never_called() -> MockDynamicPlanner {
        let mut planner = MockDynamicPlanner::new();
        planner.expect_plan_and_run().never();
        planner
    }

    fn llm_never_called() -> MockLlmProvider {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().never();
        llm
    }

    fn service(
        store: MockSimilarityStore,
        loader: MockSpecLoader,
        planner: MockDynamicPlanner,
        classifier: MockIntentClassifier,
        llm: MockLlmProvider,
    ) -> HandleService {
        let mut executor = MockWorkflowExecutor::new();
        executor.expect_execute().never();

        let resolver = WorkflowResolver::new(
            Arc::new(store),
            Arc::new(MockWorkflowRepository::new()),
            Arc::new(executor),
            Arc::new(planner),
            WorkflowResolverConfig::default(),
        )
        .with_spec_loader(Arc::new(loader));

        HandleService::new(Arc::new(resolver), Arc::new(classifier), Arc::new(llm))
    }

    #[tokio::test]
    async fn test_single_intent_answers_with_api_output() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|request| {
                request.messages[0].content.starts_with(BASE_PROMPT)
                    && request.messages[1].content.contains(TEXT)
                    && request.messages[1].content.contains("API response:\n{\"id\":7}")
            })
            .times(1)
            .returning(|_| Ok(LlmResponse::new("gpt", r#"{"bot_message": "Ticket 7 created"}"#)));

        let answer = service(
            MockSimilarityStore::new(),
            loader_ok(),
            planner_returning(json!({"id": 7})),
            classifier(false),
            llm,
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap();

        assert_eq!(answer, json!({"bot_message": "Ticket 7 created"}));
    }

    #[tokio::test]
    async fn test_planner_failure_still_answers() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|request| !request.messages[1].content.contains("API response"))
            .times(1)
            .returning(|_| Ok(LlmResponse::new("gpt", "I could not reach the helpdesk API.")));

        let answer = service(
            MockSimilarityStore::new(),
            loader_ok(),
            planner_failing(),
            classifier(false),
            llm,
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap();

        assert_eq!(answer, json!({"bot_message": "I could not reach the helpdesk API."}));
    }

    #[tokio::test]
    async fn test_multiple_intents_resolve_as_workflow() {
        let mut store = MockSimilarityStore::new();
        store.expect_search().times(1).returning(|_, _, _| Ok(vec![]));

        let output = service(
            store,
            loader_ok(),
            planner_returning(json!({"id": 7})),
            classifier(true),
            llm_never_called(),
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap();

        assert_eq!(output, json!({"response": {"id": 7}}));
    }

    #[tokio::test]
    async fn test_missing_spec_is_reported_before_planning() {
        let mut loader = MockSpecLoader::new();
        loader
            .expect_load()
            .times(1)
            .returning(|source| Err(DomainError::not_found(source)));

        let err = service(
            MockSimilarityStore::new(),
            loader,
            planner_never_called(),
            classifier(false),
            llm_never_called(),
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap_err();

        assert!(matches!(err, WorkflowError::SpecNotFound(_)));
    }

    #[tokio::test]
    async fn test_classifier_failure_takes_single_intent_path() {
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_has_multiple_intents()
            .times(1)
            .returning(|_| Err(DomainError::provider("openai", "rate limited")));

        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .times(1)
            .returning(|_| Ok(LlmResponse::new("gpt", r#"{"bot_message": "done"}"#)));

        let answer = service(
            MockSimilarityStore::new(),
            loader_ok(),
            planner_returning(json!({"id": 7})),
            classifier,
            llm,
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap();

        assert_eq!(answer["bot_message"], "done");
    }

    #[tokio::test]
    async fn test_base_prompt_is_checked_first() {
        let mut classifier = MockIntentClassifier::new();
        classifier.expect_has_multiple_intents().never();

        let err = service(
            MockSimilarityStore::new(),
            MockSpecLoader::new(),
            planner_never_called(),
            classifier,
            llm_never_called(),
        )
        .handle("  ", &WorkflowData::new("", ""))
        .await
        .unwrap_err();

        assert_eq!(err, WorkflowError::validation("base_prompt is required"));
    }

    #[tokio::test]
    async fn test_answer_failure_is_surfaced() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .times(1)
            .returning(|_| Err(DomainError::provider("openai", "timeout")));

        let err = service(
            MockSimilarityStore::new(),
            loader_ok(),
            planner_returning(json!({"id": 7})),
            classifier(false),
            llm,
        )
        .handle(BASE_PROMPT, &data())
        .await
        .unwrap_err();

        assert!(matches!(err, WorkflowError::Answer(_)));
    }
}
