//! Chat model capability used for payload generation and planning

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder, ResponseFormat};
pub use response::LlmResponse;

#[cfg(test)]
pub use provider::MockLlmProvider;
