//! Domain layer - Core business logic and entities

pub mod api_call;
pub mod embedding;
pub mod error;
pub mod intent;
pub mod llm;
pub mod openapi;
pub mod payload;
pub mod planner;
pub mod similarity;
pub mod workflow;

pub use api_call::{ApiInvoker, ApiRequest, ApiResponse};
pub use error::DomainError;
pub use intent::IntentClassifier;
pub use openapi::{OpenApiDocument, OperationSpec, SpecLoader};
pub use payload::{ApiPayload, HttpMethod, PayloadError, PayloadGenerator};
pub use planner::DynamicPlanner;
pub use similarity::{SimilarDocument, SimilarityMatch, SimilarityStore};
pub use workflow::{
    Flow, RecordInfo, WorkflowData, WorkflowError, WorkflowExecutor, WorkflowId, WorkflowRecord,
    WorkflowRepository, WorkflowStep,
};
