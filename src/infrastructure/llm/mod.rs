//! OpenAI-compatible chat client

mod http_client;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiChatClient;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
