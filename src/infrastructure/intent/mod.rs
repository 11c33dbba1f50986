//! Intent classification adapters

mod llm_classifier;

pub use llm_classifier::LlmIntentClassifier;
