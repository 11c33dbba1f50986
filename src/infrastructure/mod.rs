//! Infrastructure layer - External service implementations

pub mod api_call;
pub mod embedding;
pub mod intent;
pub mod llm;
pub mod logging;
pub mod openapi;
pub mod payload;
pub mod planner;
pub mod services;
pub mod similarity;
pub mod workflow;
