use serde::Deserialize;

use crate::infrastructure::workflow::{
    WorkflowExecutorConfig, WorkflowResolverConfig, DEFAULT_NAMESPACE,
    DEFAULT_SIMILARITY_THRESHOLD,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub workflow: WorkflowConfig,
    pub openapi: OpenApiConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Workflow resolution and replay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub namespace: String,
    pub similarity_threshold: f32,
    pub lookup_timeout_ms: u64,
    /// Bound on the dynamic planning fallback
    pub planner_timeout_ms: u64,
    /// Bound on each step; also the timeout of the API invoker's client
    pub step_timeout_ms: u64,
    pub fail_on_http_error: bool,
    pub salvage_partial_results: bool,
    /// JSON array of workflow records loaded at startup
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// Prefix for specification sources that are not `https://` URLs
    pub shared_folder: String,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
    pub fetch_timeout_ms: u64,
}

/// OpenAI-compatible endpoint settings; the key comes from `OPENAI_API_KEY`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let resolver = WorkflowResolverConfig::default();
        let executor = WorkflowExecutorConfig::default();

        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            lookup_timeout_ms: resolver.lookup_timeout_ms,
            planner_timeout_ms: resolver.planner_timeout_ms,
            step_timeout_ms: executor.step_timeout_ms,
            fail_on_http_error: executor.fail_on_http_error,
            salvage_partial_results: executor.salvage_partial_results,
            seed_file: None,
        }
    }
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            shared_folder: "/app/shared_data/".to_string(),
            cache_ttl_secs: 300,
            cache_capacity: 64,
            fetch_timeout_ms: 30000,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            timeout_ms: 60000,
        }
    }
}

impl WorkflowConfig {
    pub fn resolver_config(&self) -> WorkflowResolverConfig {
        WorkflowResolverConfig {
            namespace: self.namespace.clone(),
            similarity_threshold: self.similarity_threshold,
            lookup_timeout_ms: self.lookup_timeout_ms,
            planner_timeout_ms: self.planner_timeout_ms,
        }
    }

    pub fn executor_config(&self) -> WorkflowExecutorConfig {
        WorkflowExecutorConfig {
            step_timeout_ms: self.step_timeout_ms,
            fail_on_http_error: self.fail_on_http_error,
            salvage_partial_results: self.salvage_partial_results,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
