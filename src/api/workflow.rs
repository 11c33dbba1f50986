//! Workflow run endpoint

use axum::extract::State;
use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::WorkflowData;
use crate::infrastructure::openapi::normalize_swagger_source;

/// Reject a request missing `text`, then one missing `swagger_url`
pub(crate) fn check_request(data: &WorkflowData) -> Result<(), ApiError> {
    data.validate().map_err(ApiError::from)?;

    if data.swagger_src().trim().is_empty() {
        return Err(ApiError::bad_request("swagger_url is required").with_param("swagger_url"));
    }

    Ok(())
}

/// POST /workflow/run
pub async fn run_workflow(
    State(state): State<AppState>,
    Json(data): Json<WorkflowData>,
) -> Result<Json<Value>, ApiError> {
    check_request(&data)?;

    let run_id = Uuid::new_v4().to_string();
    let source = normalize_swagger_source(data.swagger_src(), &state.shared_folder);
    let data = data.with_swagger_src(source);

    let span = tracing::info_span!("workflow_run", run_id = %run_id);

    async move {
        info!(swagger_src = %data.swagger_src(), "Processing workflow request");

        let output = state.resolver.resolve(&data).await.map_err(|e| {
            tracing::error!(error = %e, "Workflow run failed");
            ApiError::from(e)
        })?;

        info!(replayed = output.is_replayed(), "Workflow request completed");
        Ok::<_, ApiError>(Json(output.into_json()))
    }
    .instrument(span)
    .await
}
