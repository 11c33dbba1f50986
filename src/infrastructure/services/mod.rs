//! Request-level services built on the workflow core

mod handle_service;

pub use handle_service::HandleService;
