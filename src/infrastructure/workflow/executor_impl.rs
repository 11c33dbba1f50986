//! Workflow executor implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::api_call::{ApiInvoker, ApiRequest};
use crate::domain::payload::{resolve_url, PayloadGenerator};
use crate::domain::workflow::{
    RecordInfo, WorkflowData, WorkflowError, WorkflowExecutor, WorkflowRecord,
};

/// Configuration for the workflow executor
#[derive(Debug, Clone)]
pub struct WorkflowExecutorConfig {
    /// Timeout for each payload generation and each API call, in milliseconds
    pub step_timeout_ms: u64,

    /// Treat non-2xx API responses as invocation failures
    pub fail_on_http_error: bool,

    /// Attach the results gathered so far to a step failure
    pub salvage_partial_results: bool,
}

impl Default for WorkflowExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout_ms: 60000,
            fail_on_http_error: true,
            salvage_partial_results: false,
        }
    }
}

/// Replays recorded workflows flow by flow, threading each step's raw
/// response into the next step of the same flow
pub struct WorkflowExecutorImpl {
    generator: Arc<dyn PayloadGenerator>,
    invoker: Arc<dyn ApiInvoker>,
    config: WorkflowExecutorConfig,
}

/// Outcome of one successful step
struct StepOutput {
    parsed: Value,
    raw: String,
}

impl WorkflowExecutorImpl {
    pub fn new(generator: Arc<dyn PayloadGenerator>, invoker: Arc<dyn ApiInvoker>) -> Self {
        Self::with_config(generator, invoker, WorkflowExecutorConfig::default())
    }

    pub fn with_config(
        generator: Arc<dyn PayloadGenerator>,
        invoker: Arc<dyn ApiInvoker>,
        config: WorkflowExecutorConfig,
    ) -> Self {
        Self {
            generator,
            invoker,
            config,
        }
    }

    fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.config.step_timeout_ms)
    }

    async fn execute_step(
        &self,
        flow_index: usize,
        operation_id: &str,
        data: &WorkflowData,
        prev_response: &str,
    ) -> Result<StepOutput, WorkflowError> {
        let payload = tokio::time::timeout(
            self.step_timeout(),
            self.generator
                .generate(data.swagger_src(), data.text(), operation_id, prev_response),
        )
        .await
        .map_err(|_| {
            WorkflowError::generation(
                flow_index,
                operation_id,
                format!("timed out after {}ms", self.config.step_timeout_ms),
            )
        })?
        .map_err(|e| WorkflowError::generation(flow_index, operation_id, e.to_string()))?;

        let url = resolve_url(&payload, data.server_base_url())
            .map_err(|e| WorkflowError::resolution(flow_index, operation_id, e.to_string()))?;

        debug!(
            flow_index,
            operation_id = %operation_id,
            method = %payload.method,
            url = %url,
            "Invoking workflow step"
        );

        let request = ApiRequest::from_payload(payload, url, data.headers().clone());

        let response = tokio::time::timeout(self.step_timeout(), self.invoker.invoke(request))
            .await
            .map_err(|_| {
                WorkflowError::invocation(
                    flow_index,
                    operation_id,
                    format!("timed out after {}ms", self.config.step_timeout_ms),
                )
            })?
            .map_err(|e| WorkflowError::invocation(flow_index, operation_id, e.to_string()))?;

        if self.config.fail_on_http_error && !response.is_success() {
            return Err(WorkflowError::invocation(
                flow_index,
                operation_id,
                format!("HTTP {}: {}", response.status, response.body),
            ));
        }

        let parsed = response.json().map_err(|e| {
            WorkflowError::invocation(
                flow_index,
                operation_id,
                format!("response is not valid JSON: {}", e),
            )
        })?;

        Ok(StepOutput {
            parsed,
            raw: response.body,
        })
    }

    fn fail(&self, error: WorkflowError, record_info: &RecordInfo) -> WorkflowError {
        warn!(error = %error, "Workflow step failed, aborting execution");

        if self.config.salvage_partial_results {
            WorkflowError::partial(error, record_info.to_json_string())
        } else {
            error
        }
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowExecutorImpl {
    async fn execute(
        &self,
        record: &WorkflowRecord,
        data: &WorkflowData,
    ) -> Result<String, WorkflowError> {
        let start = Instant::now();
        let mut record_info = RecordInfo::new(record.name());

        debug!(
            workflow_id = %record.id(),
            flows = record.flows().len(),
            steps = record.step_count(),
            "Executing workflow"
        );

        for (flow_index, flow) in record.flows().iter().enumerate() {
            let mut prev_response = String::new();

            for step in flow.steps() {
                let step_start = Instant::now();
                let operation_id = step.operation_id();

                let output = match self
                    .execute_step(flow_index, operation_id, data, &prev_response)
                    .await
                {
                    Ok(output) => output,
                    Err(e) => return Err(self.fail(e, &record_info)),
                };

                debug!(
                    flow_index,
                    operation_id = %operation_id,
                    duration_ms = step_start.elapsed().as_millis() as u64,
                    "Workflow step completed"
                );

                record_info.insert(operation_id, output.parsed);
                prev_response = output.raw;
            }
        }

        info!(
            workflow_id = %record.id(),
            operations = record_info.operation_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Workflow executed"
        );

        Ok(record_info.to_json_string())
    }
}
