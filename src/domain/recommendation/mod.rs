pub mod client;
pub mod dto;
pub mod envelope;
pub mod handler;
pub mod normalizer;
pub mod prompt;
pub mod service;
pub mod validator;

pub use client::{build_llm_client, LlmClient, SharedLlmClient};
pub use service::RecommendationService;
