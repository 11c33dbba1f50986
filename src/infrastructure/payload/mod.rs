//! LLM-backed payload generation

mod llm_generator;

pub use llm_generator::LlmPayloadGenerator;
