//! Workflow record entity

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// Maximum length for workflow IDs
pub const MAX_ID_LENGTH: usize = 64;

/// Regex pattern for valid workflow IDs: alphanumeric, hyphens and underscores
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$").unwrap());

/// Validated workflow identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Create a new validated workflow ID
    pub fn new(id: impl Into<String>) -> Result<Self, WorkflowError> {
        let id = id.into();
        validate_workflow_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WorkflowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a workflow ID string
pub fn validate_workflow_id(id: &str) -> Result<(), WorkflowError> {
    if id.is_empty() {
        return Err(WorkflowError::validation("Workflow ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(WorkflowError::validation(format!(
            "Workflow ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(WorkflowError::validation(format!(
            "Invalid workflow ID '{}': must be alphanumeric with hyphens or underscores",
            id
        )));
    }

    Ok(())
}

/// A single recorded API operation inside a flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowStep {
    /// OpenAPI `operationId` this step calls
    open_api_operation_id: String,
}

impl WorkflowStep {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            open_api_operation_id: operation_id.into(),
        }
    }

    pub fn operation_id(&self) -> &str {
        &self.open_api_operation_id
    }
}

/// An ordered sequence of steps sharing response context
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flow {
    #[serde(default)]
    steps: Vec<WorkflowStep>,
}

impl Flow {
    pub fn new(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }

    /// Build a flow from a list of operation IDs
    pub fn from_operations<I, S>(operation_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: operation_ids.into_iter().map(WorkflowStep::new).collect(),
        }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A recorded workflow: a name plus independent flows of API steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowRecord {
    id: WorkflowId,

    name: String,

    /// Free text used when indexing the workflow for similarity search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default)]
    flows: Vec<Flow>,
}

impl WorkflowRecord {
    pub fn new(id: WorkflowId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            flows: Vec::new(),
        }
    }

    // Builder methods

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flows.push(flow);
        self
    }

    pub fn with_flows(mut self, flows: Vec<Flow>) -> Self {
        self.flows = flows;
        self
    }

    // Getters

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Total number of steps across all flows
    pub fn step_count(&self) -> usize {
        self.flows.iter().map(|f| f.steps().len()).sum()
    }

    /// Text indexed in the similarity store for this workflow
    pub fn index_text(&self) -> String {
        match self.description() {
            Some(desc) if !desc.is_empty() => format!("{}\n{}", self.name, desc),
            _ => self.name.clone(),
        }
    }
}
