//! LLM-backed summarization and action-item extraction.
//!
//! The model call itself lives behind [`LlmClient`], with one implementation
//! per API flavor (Ollama, OpenAI-compatible) selected by configuration.
//! [`Summarizer`] and [`ActionExtractor`] own the prompts and response
//! parsing on top of whichever client is configured.

pub mod actions;
pub mod client;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod summarizer;

pub use actions::{ActionExtractor, ActionItem, LlmActionExtractor, MockActionExtractor};
pub use client::{LlmClient, MockLlmClient};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use summarizer::{LlmSummarizer, MockSummarizer, Summarizer};

use crate::config::{LlmBackend, LlmConfig};
use crate::defaults;
use std::sync::Arc;

/// Build the configured LLM client.
pub fn build_client(config: &LlmConfig) -> Arc<dyn LlmClient> {
    match config.backend {
        LlmBackend::Ollama => Arc::new(OllamaClient::new(
            config
                .base_url
                .as_deref()
                .unwrap_or(defaults::OLLAMA_BASE_URL),
            &config.model,
        )),
        LlmBackend::Openai => Arc::new(OpenAiClient::new(
            config
                .base_url
                .as_deref()
                .unwrap_or(defaults::OPENAI_BASE_URL),
            config.api_key.as_deref().unwrap_or("lm-studio"),
            &config.model,
        )),
    }
}
