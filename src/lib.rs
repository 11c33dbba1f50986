//! OpenAPI workflow gateway
//!
//! Maps a free-text request onto API calls described by an OpenAPI document:
//! - replays a recorded multi-step workflow when a similar one is indexed
//! - otherwise plans a single call directly from the document

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::embedding::EmbeddingProvider;
use domain::llm::LlmProvider;
use domain::{
    ApiInvoker, DynamicPlanner, IntentClassifier, PayloadGenerator, SimilarityStore, SpecLoader,
    WorkflowExecutor, WorkflowRepository,
};
use infrastructure::{
    api_call::ReqwestApiInvoker,
    embedding::OpenAiEmbeddingProvider,
    intent::LlmIntentClassifier,
    llm::{HttpClient, OpenAiChatClient},
    openapi::HttpSpecLoader,
    payload::LlmPayloadGenerator,
    planner::SingleCallPlanner,
    services::HandleService,
    similarity::InMemorySimilarityStore,
    workflow::{
        InMemoryWorkflowRepository, WorkflowExecutorImpl, WorkflowIndexer, WorkflowResolver,
    },
};
use tracing::{info, warn};

/// Services shared by the HTTP server and the CLI
pub struct Services {
    pub resolver: Arc<WorkflowResolver>,
    pub handler: Arc<HandleService>,
    pub repository: Arc<dyn WorkflowRepository>,
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let services = create_services(config).await?;

    Ok(AppState::new(
        services.resolver,
        services.handler,
        services.repository,
        config.openapi.shared_folder.clone(),
    ))
}

/// Wire the resolver, the request handler and the repository they read from
pub async fn create_services(config: &AppConfig) -> anyhow::Result<Services> {
    let http_client = HttpClient::with_timeout(Duration::from_millis(config.llm.timeout_ms))?;
    let (llm, embedder) = create_openai_providers(config, http_client);

    let fetch_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.openapi.fetch_timeout_ms))
        .build()?;

    let loader: Arc<dyn SpecLoader> = Arc::new(HttpSpecLoader::with_cache(
        fetch_client,
        Duration::from_secs(config.openapi.cache_ttl_secs),
        config.openapi.cache_capacity,
    ));

    let generator: Arc<dyn PayloadGenerator> =
        Arc::new(LlmPayloadGenerator::new(loader.clone(), llm.clone()));
    let invoker: Arc<dyn ApiInvoker> = Arc::new(ReqwestApiInvoker::with_timeout(
        Duration::from_millis(config.workflow.step_timeout_ms),
    )?);

    let store: Arc<dyn SimilarityStore> = Arc::new(InMemorySimilarityStore::new(embedder));
    let repository = create_repository(config).await?;

    let indexer = WorkflowIndexer::new(store.clone(), config.workflow.namespace.clone());
    match indexer.index_all(repository.as_ref()).await {
        Ok(count) => info!(count, namespace = %config.workflow.namespace, "Indexed workflows"),
        Err(e) => warn!(error = %e, "Failed to index seeded workflows"),
    }

    let executor: Arc<dyn WorkflowExecutor> = Arc::new(WorkflowExecutorImpl::with_config(
        generator.clone(),
        invoker.clone(),
        config.workflow.executor_config(),
    ));

    let planner: Arc<dyn DynamicPlanner> = Arc::new(SingleCallPlanner::new(
        loader.clone(),
        llm.clone(),
        generator,
        invoker,
    ));

    let resolver = Arc::new(
        WorkflowResolver::new(
            store,
            repository.clone(),
            executor,
            planner,
            config.workflow.resolver_config(),
        )
        .with_spec_loader(loader),
    );

    let classifier: Arc<dyn IntentClassifier> = Arc::new(LlmIntentClassifier::new(llm.clone()));
    let handler = Arc::new(HandleService::new(resolver.clone(), classifier, llm));

    Ok(Services {
        resolver,
        handler,
        repository,
    })
}

fn create_openai_providers(
    config: &AppConfig,
    http_client: HttpClient,
) -> (Arc<dyn LlmProvider>, Arc<dyn EmbeddingProvider>) {
    let api_key =
        std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| "sk-placeholder".to_string());
    let base_url = std::env::var("OPENAI_BASE_URL")
        .ok()
        .or_else(|| config.llm.base_url.clone());

    let (chat, embeddings) = match base_url {
        Some(url) => {
            info!("Using OpenAI provider with custom base URL: {}", url);
            (
                OpenAiChatClient::with_base_url(http_client.clone(), &api_key, &url),
                OpenAiEmbeddingProvider::with_base_url(http_client, &api_key, &url),
            )
        }
        None => {
            info!("Using OpenAI provider with default base URL");
            (
                OpenAiChatClient::new(http_client.clone(), &api_key),
                OpenAiEmbeddingProvider::new(http_client, &api_key),
            )
        }
    };

    (
        Arc::new(chat.with_model(&config.llm.chat_model)),
        Arc::new(embeddings.with_model(&config.llm.embedding_model)),
    )
}

async fn create_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn WorkflowRepository>> {
    let Some(path) = &config.workflow.seed_file else {
        info!("No workflow seed file configured, starting with an empty repository");
        return Ok(Arc::new(InMemoryWorkflowRepository::new()));
    };

    let repository = InMemoryWorkflowRepository::from_file(path).await?;
    info!(path = %path, "Loaded workflow seed file");

    Ok(Arc::new(repository))
}
