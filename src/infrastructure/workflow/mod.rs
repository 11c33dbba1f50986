//! Workflow infrastructure implementations

mod executor_impl;
mod in_memory_repository;
mod indexer;
mod resolver;

pub use executor_impl::{WorkflowExecutorConfig, WorkflowExecutorImpl};
pub use in_memory_repository::InMemoryWorkflowRepository;
pub use indexer::WorkflowIndexer;
pub use resolver::{
    LookupOutcome, ResolveOutput, WorkflowResolver, WorkflowResolverConfig, DEFAULT_NAMESPACE,
    DEFAULT_SIMILARITY_THRESHOLD,
};
