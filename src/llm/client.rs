use crate::error::{RecapError, Result};

/// Trait for a plain prompt-in, text-out LLM call.
///
/// Implementations differ only in the HTTP API flavor they speak; prompt
/// construction and response parsing live with the callers.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a prompt and return the model's full text response.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Mock LLM client for testing
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    response: String,
    should_fail: bool,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            response: "mock completion".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on complete.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        if self.should_fail {
            Err(RecapError::Llm {
                message: "mock LLM failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
