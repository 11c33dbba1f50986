//! OpenAPI document model
//!
//! A thin, read-only view over a parsed OpenAPI 3 or Swagger 2 document that
//! exposes what payload generation needs: operations by ID, their parameters
//! and request bodies, and the declared servers.

mod document;
mod loader;

pub use document::{OpenApiDocument, OperationSpec};
pub use loader::SpecLoader;

#[cfg(test)]
pub use loader::MockSpecLoader;
