pub mod llm_service;
pub mod prompts;
pub mod question_parser;

pub use llm_service::{LlmService, ModelClient};
