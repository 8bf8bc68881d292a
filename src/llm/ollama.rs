//! Ollama API client.

use crate::defaults;
use crate::error::{RecapError, Result};
use crate::llm::client::LlmClient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// LLM client for a local Ollama server (`POST /api/generate`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: defaults::LLM_TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await
            .map_err(|e| RecapError::Llm {
                message: format!("Ollama request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(RecapError::Llm {
                message: format!("Ollama returned status {}", response.status()),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| RecapError::Llm {
            message: format!("Failed to parse Ollama response: {e}"),
        })?;

        Ok(body.response)
    }
}
