//! Single-entry endpoint: intent routing plus a chat answer

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::workflow::check_request;
use crate::domain::WorkflowData;
use crate::infrastructure::openapi::normalize_swagger_source;

/// Body of `POST /handle`
#[derive(Debug, Deserialize)]
pub struct HandleRequest {
    /// Instructions that frame the assistant's answer
    #[serde(default)]
    pub base_prompt: String,

    #[serde(flatten)]
    pub data: WorkflowData,
}

/// POST /handle
pub async fn handle(
    State(state): State<AppState>,
    Json(request): Json<HandleRequest>,
) -> Result<Json<Value>, ApiError> {
    let HandleRequest { base_prompt, data } = request;

    if base_prompt.trim().is_empty() {
        return Err(ApiError::bad_request("base_prompt is required").with_param("base_prompt"));
    }
    check_request(&data)?;

    let request_id = Uuid::new_v4().to_string();
    let source = normalize_swagger_source(data.swagger_src(), &state.shared_folder);
    let data = data.with_swagger_src(source);

    let span = tracing::info_span!("handle", request_id = %request_id);

    async move {
        info!(swagger_src = %data.swagger_src(), "Handling request");

        let answer = state.handler.handle(&base_prompt, &data).await.map_err(|e| {
            tracing::error!(error = %e, "Request handling failed");
            ApiError::from(e)
        })?;

        Ok::<_, ApiError>(Json(answer))
    }
    .instrument(span)
    .await
}
