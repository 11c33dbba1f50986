use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handle;
use super::health;
use super::state::AppState;
use super::workflow;

/// Router with the stateless health checks only
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/workflow/run", post(workflow::run_workflow))
        .route("/handle", post(handle::handle))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::intent::MockIntentClassifier;
    use crate::domain::llm::{LlmResponse, MockLlmProvider};
    use crate::domain::openapi::MockSpecLoader;
    use crate::domain::planner::MockDynamicPlanner;
    use crate::domain::similarity::MockSimilarityStore;
    use crate::domain::workflow::{MockWorkflowExecutor, MockWorkflowRepository};
    use crate::domain::DomainError;
    use crate::infrastructure::services::HandleService;
    use crate::infrastructure::workflow::{WorkflowResolver, WorkflowResolverConfig};

    fn empty_store() -> MockSimilarityStore {
        let mut store = MockSimilarityStore::new();
        store.expect_search().returning(|_, _, _| Ok(vec![]));
        store
    }

    fn repository() -> MockWorkflowRepository {
        let mut repository = MockWorkflowRepository::new();
        repository.expect_count().returning(|| Ok(2));
        repository
    }

    fn full_state(
        store: MockSimilarityStore,
        planner: MockDynamicPlanner,
        loader: Option<MockSpecLoader>,
        classifier: MockIntentClassifier,
        llm: MockLlmProvider,
    ) -> AppState {
        let repository: Arc<MockWorkflowRepository> = Arc::new(repository());
        let mut resolver = WorkflowResolver::new(
            Arc::new(store),
            repository.clone(),
            Arc::new(MockWorkflowExecutor::new()),
            Arc::new(planner),
            WorkflowResolverConfig::default(),
        );
        if let Some(loader) = loader {
            resolver = resolver.with_spec_loader(Arc::new(loader));
        }

        let resolver = Arc::new(resolver);
        let handler = HandleService::new(resolver.clone(), Arc::new(classifier), Arc::new(llm));

        AppState::new(resolver, Arc::new(handler), repository, "/shared/")
    }

    fn state(store: MockSimilarityStore, planner: MockDynamicPlanner) -> AppState {
        full_state(
            store,
            planner,
            None,
            MockIntentClassifier::new(),
            MockLlmProvider::new(),
        )
    }

    fn single_intent() -> MockIntentClassifier {
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_has_multiple_intents()
            .times(1)
            .returning(|_| Ok(false));
        classifier
    }

    /// State whose lookup and planner must not be reached
    fn idle_state() -> AppState {
        state(MockSimilarityStore::new(), MockDynamicPlanner::new())
    }

    async fn post_run(app: Router, body: Value) -> (StatusCode, Value) {
        post_json(app, "/workflow/run", body).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_and_live() {
        let app = create_router();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_workflow_count() {
        let app = create_router_with_state(idle_state());

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["checks"][0]["workflows"], 2);
    }

    #[tokio::test]
    async fn test_run_falls_back_to_planner_with_normalized_source() {
        let mut planner = MockDynamicPlanner::new();
        planner
            .expect_plan_and_run()
            .withf(|source, text, headers| {
                source == "/shared/tickets.yaml"
                    && text == "list my tickets"
                    && headers.get("Authorization").map(String::as_str) == Some("Bearer t")
            })
            .times(1)
            .returning(|_, _, _| Ok(json!([{"id": 1}])));

        let app = create_router_with_state(state(empty_store(), planner));

        let (status, body) = post_run(
            app,
            json!({
                "text": "list my tickets",
                "swagger_url": "tickets.yaml",
                "headers": {"Authorization": "Bearer t"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": [{"id": 1}]}));
    }

    #[tokio::test]
    async fn test_run_requires_swagger_url() {
        let app = create_router_with_state(idle_state());

        let (status, body) = post_run(app, json!({"text": "list my tickets"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "swagger_url is required");
        assert_eq!(body["error"]["param"], "swagger_url");
    }

    #[tokio::test]
    async fn test_run_requires_text() {
        let app = create_router_with_state(idle_state());

        let (status, body) = post_run(
            app,
            json!({"text": "  ", "swagger_url": "https://api.example.com/openapi.json"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "text is required");
    }

    #[tokio::test]
    async fn test_run_reports_missing_text_before_swagger_url() {
        let app = create_router_with_state(idle_state());

        let (status, body) = post_run(app, json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "text is required");
    }

    #[tokio::test]
    async fn test_handle_checks_base_prompt_first() {
        let app = create_router_with_state(idle_state());

        let (status, body) = post_json(app, "/handle", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "base_prompt is required");
        assert_eq!(body["error"]["param"], "base_prompt");
    }

    #[tokio::test]
    async fn test_handle_answers_single_intent() {
        let mut planner = MockDynamicPlanner::new();
        planner
            .expect_plan_and_run()
            .withf(|source, _, _| source == "/shared/tickets.yaml")
            .times(1)
            .returning(|_, _, _| Ok(json!([{"id": 1}])));

        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|request| request.messages[0].content.starts_with("You are a helpdesk bot."))
            .times(1)
            .returning(|_| Ok(LlmResponse::new("gpt", r#"{"bot_message": "You have 1 ticket."}"#)));

        let app = create_router_with_state(full_state(
            MockSimilarityStore::new(),
            planner,
            None,
            single_intent(),
            llm,
        ));

        let (status, body) = post_json(
            app,
            "/handle",
            json!({
                "base_prompt": "You are a helpdesk bot.",
                "text": "list my tickets",
                "swagger_url": "tickets.yaml"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"bot_message": "You have 1 ticket."}));
    }

    #[tokio::test]
    async fn test_handle_missing_spec_is_not_found() {
        let mut loader = MockSpecLoader::new();
        loader
            .expect_load()
            .withf(|source| source == "/shared/missing.json")
            .times(1)
            .returning(|source| Err(DomainError::not_found(source)));

        let app = create_router_with_state(full_state(
            MockSimilarityStore::new(),
            MockDynamicPlanner::new(),
            Some(loader),
            single_intent(),
            MockLlmProvider::new(),
        ));

        let (status, body) = post_json(
            app,
            "/handle",
            json!({
                "base_prompt": "You are a helpdesk bot.",
                "text": "list my tickets",
                "swagger_url": "missing.json"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "spec_not_found");
        assert_eq!(body["error"]["param"], "swagger_url");
    }

    #[tokio::test]
    async fn test_planner_failure_is_bad_gateway() {
        let mut planner = MockDynamicPlanner::new();
        planner
            .expect_plan_and_run()
            .returning(|_, _, _| Err(DomainError::provider("openai", "quota exceeded")));

        let app = create_router_with_state(state(empty_store(), planner));

        let (status, body) = post_run(
            app,
            json!({
                "text": "list my tickets",
                "swagger_url": "https://api.example.com/openapi.json"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "upstream_error");
        assert_eq!(body["error"]["code"], "dynamic_planner_failed");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = create_router_with_state(idle_state());

        let request = Request::builder()
            .method("POST")
            .uri("/workflow/run")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
