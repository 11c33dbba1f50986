//! Workflow resolution: replay a recorded workflow or fall back to planning

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::domain::openapi::SpecLoader;
use crate::domain::planner::DynamicPlanner;
use crate::domain::similarity::SimilarityStore;
use crate::domain::workflow::{
    WorkflowData, WorkflowError, WorkflowExecutor, WorkflowId, WorkflowRecord, WorkflowRepository,
};

pub const DEFAULT_NAMESPACE: &str = "workflows";
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.88;

/// Configuration for the workflow resolver
#[derive(Debug, Clone)]
pub struct WorkflowResolverConfig {
    /// Similarity store namespace holding indexed workflows
    pub namespace: String,

    /// Minimum score for a match to be replayed
    pub similarity_threshold: f32,

    /// Timeout for the similarity lookup and the repository fetch
    pub lookup_timeout_ms: u64,

    /// Timeout for the whole dynamic planning fallback
    pub planner_timeout_ms: u64,
}

impl Default for WorkflowResolverConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            lookup_timeout_ms: 10000,
            planner_timeout_ms: 120000,
        }
    }
}

/// Result of looking up a recorded workflow for a request
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A stored workflow scored at or above the threshold
    Hit {
        record: WorkflowRecord,
        document_id: String,
        score: f32,
    },
    /// Nothing scored high enough
    Miss { best_score: Option<f32> },
    /// The lookup itself failed or produced nothing usable
    Failed { reason: String },
}

/// What the resolver produced
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutput {
    /// Serialized record info from replaying a workflow
    Replayed(String),
    /// Result of the dynamic planner
    Planned(Value),
}

impl ResolveOutput {
    /// JSON body returned to callers
    ///
    /// Replays return the record info itself; planner results are wrapped as
    /// `{"response": ...}`.
    pub fn into_json(self) -> Value {
        match self {
            Self::Replayed(raw) => {
                serde_json::from_str(&raw).unwrap_or(Value::String(raw))
            }
            Self::Planned(value) => json!({ "response": value }),
        }
    }

    pub fn is_replayed(&self) -> bool {
        matches!(self, Self::Replayed(_))
    }
}

/// Decides between replaying a recorded workflow and dynamic planning
pub struct WorkflowResolver {
    store: Arc<dyn SimilarityStore>,
    repository: Arc<dyn WorkflowRepository>,
    executor: Arc<dyn WorkflowExecutor>,
    planner: Arc<dyn DynamicPlanner>,
    spec_loader: Option<Arc<dyn SpecLoader>>,
    config: WorkflowResolverConfig,
}

impl WorkflowResolver {
    pub fn new(
        store: Arc<dyn SimilarityStore>,
        repository: Arc<dyn WorkflowRepository>,
        executor: Arc<dyn WorkflowExecutor>,
        planner: Arc<dyn DynamicPlanner>,
        config: WorkflowResolverConfig,
    ) -> Self {
        Self {
            store,
            repository,
            executor,
            planner,
            spec_loader: None,
            config,
        }
    }

    /// Check that the specification loads before any lookup or planning
    pub fn with_spec_loader(mut self, loader: Arc<dyn SpecLoader>) -> Self {
        self.spec_loader = Some(loader);
        self
    }

    pub fn config(&self) -> &WorkflowResolverConfig {
        &self.config
    }

    /// Resolve a request to a replayed workflow or a planner result
    pub async fn resolve(&self, data: &WorkflowData) -> Result<ResolveOutput, WorkflowError> {
        data.validate()?;
        self.check_spec(data.swagger_src()).await?;

        match self.lookup(data.text()).await {
            LookupOutcome::Hit {
                record,
                document_id,
                score,
            } => {
                info!(
                    document_id = %document_id,
                    workflow_id = %record.id(),
                    score,
                    "Record is highly similar, replaying workflow"
                );

                let output = self.executor.execute(&record, data).await?;
                return Ok(ResolveOutput::Replayed(output));
            }
            LookupOutcome::Miss { best_score } => {
                debug!(
                    best_score = ?best_score,
                    threshold = self.config.similarity_threshold,
                    "No workflow above threshold"
                );
            }
            LookupOutcome::Failed { reason } => {
                warn!(
                    namespace = %self.config.namespace,
                    error = %reason,
                    "Error fetching workflow from namespace"
                );
            }
        }

        let value = self.plan(data).await?;
        Ok(ResolveOutput::Planned(value))
    }

    /// Load the specification once so a bad source fails fast.
    ///
    /// A no-op when no loader is configured.
    pub async fn check_spec(&self, source: &str) -> Result<(), WorkflowError> {
        let Some(loader) = &self.spec_loader else {
            return Ok(());
        };

        loader
            .load(source)
            .await
            .map(|_| ())
            .map_err(WorkflowError::from_spec_load)
    }

    /// Run the dynamic planner, bounded by `planner_timeout_ms`
    pub async fn plan(&self, data: &WorkflowData) -> Result<Value, WorkflowError> {
        let timeout = Duration::from_millis(self.config.planner_timeout_ms);
        let planning = self
            .planner
            .plan_and_run(data.swagger_src(), data.text(), data.headers());

        match tokio::time::timeout(timeout, planning).await {
            Ok(result) => result.map_err(|e| WorkflowError::planner(e.to_string())),
            Err(_) => Err(WorkflowError::planner(format!(
                "timed out after {}ms",
                self.config.planner_timeout_ms
            ))),
        }
    }

    /// Find the best matching workflow; never fails
    pub async fn lookup(&self, text: &str) -> LookupOutcome {
        let timeout = Duration::from_millis(self.config.lookup_timeout_ms);

        let matches = match tokio::time::timeout(
            timeout,
            self.store.search(&self.config.namespace, text, 1),
        )
        .await
        {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                return LookupOutcome::Failed {
                    reason: e.to_string(),
                };
            }
            Err(_) => {
                return LookupOutcome::Failed {
                    reason: format!(
                        "similarity search timed out after {}ms",
                        self.config.lookup_timeout_ms
                    ),
                };
            }
        };

        let Some(best) = matches.into_iter().next() else {
            return LookupOutcome::Miss { best_score: None };
        };

        if best.score.is_nan() || best.score < self.config.similarity_threshold {
            return LookupOutcome::Miss {
                best_score: Some(best.score),
            };
        }

        let Some(raw_id) = best.document.workflow_id() else {
            return LookupOutcome::Failed {
                reason: format!("document '{}' has no workflow_id", best.document.id()),
            };
        };

        let workflow_id = match WorkflowId::new(raw_id) {
            Ok(id) => id,
            Err(e) => {
                return LookupOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match tokio::time::timeout(timeout, self.repository.get(&workflow_id)).await {
            Ok(Ok(Some(record))) => LookupOutcome::Hit {
                record,
                document_id: best.document.id().to_string(),
                score: best.score,
            },
            Ok(Ok(None)) => LookupOutcome::Failed {
                reason: format!("workflow '{}' not found", workflow_id),
            },
            Ok(Err(e)) => LookupOutcome::Failed {
                reason: e.to_string(),
            },
            Err(_) => LookupOutcome::Failed {
                reason: format!(
                    "workflow fetch timed out after {}ms",
                    self.config.lookup_timeout_ms
                ),
            },
        }
    }
}
