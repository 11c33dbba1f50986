//! Workflow domain module
//!
//! A workflow is a named set of independent flows, each an ordered list of
//! OpenAPI operations. Replaying a workflow threads every step's raw response
//! into the payload generation of the next step in the same flow.

mod data;
mod entity;
mod error;
mod executor;
mod record_info;
pub mod repository;

pub use data::WorkflowData;
pub use entity::{
    validate_workflow_id, Flow, WorkflowId, WorkflowRecord, WorkflowStep, MAX_ID_LENGTH,
};
pub use error::WorkflowError;
pub use executor::WorkflowExecutor;
pub use record_info::{RecordInfo, WORKFLOW_NAME_KEY};
pub use repository::WorkflowRepository;

#[cfg(test)]
pub use executor::MockWorkflowExecutor;
#[cfg(test)]
pub use repository::MockWorkflowRepository;
