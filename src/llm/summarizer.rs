use crate::defaults;
use crate::error::{RecapError, Result};
use crate::llm::client::LlmClient;
use crate::llm::prompt;
use std::sync::Arc;

/// Trait for call summarization.
///
/// Returns Markdown with the fixed section ordering Goal / Key points /
/// Actions/tasks / Summary.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, full_text: &str) -> Result<String>;
}

/// LLM-backed summarizer.
pub struct LlmSummarizer {
    client: Arc<dyn LlmClient>,
}

impl LlmSummarizer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, full_text: &str) -> Result<String> {
        // Below this there is nothing to analyze; skip the model call.
        if full_text.trim().chars().count() < defaults::MIN_SUMMARY_INPUT_CHARS {
            return Ok(defaults::TOO_SHORT_MARKER.to_string());
        }
        self.client.complete(&prompt::summary_prompt(full_text)).await
    }
}

/// Mock summarizer for testing
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    response: String,
    should_fail: bool,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            response: "mock summary".to_string(),
            should_fail: false,
        }
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _full_text: &str) -> Result<String> {
        if self.should_fail {
            Err(RecapError::Llm {
                message: "mock summarization failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockLlmClient;

    #[tokio::test]
    async fn test_short_input_returns_marker_without_model_call() {
        // A failing client proves the model is never invoked.
        let client = Arc::new(MockLlmClient::new().with_failure());
        let summarizer = LlmSummarizer::new(client);

        let result = summarizer.summarize("  hi   ").await.unwrap();
        assert_eq!(result, defaults::TOO_SHORT_MARKER);
    }

    #[tokio::test]
    async fn test_empty_input_returns_marker() {
        let client = Arc::new(MockLlmClient::new().with_failure());
        let summarizer = LlmSummarizer::new(client);

        let result = summarizer.summarize("").await.unwrap();
        assert_eq!(result, defaults::TOO_SHORT_MARKER);
    }

    #[tokio::test]
    async fn test_long_input_invokes_model() {
        let client = Arc::new(MockLlmClient::new().with_response("## Goal\nShip it"));
        let summarizer = LlmSummarizer::new(client);

        let result = summarizer
            .summarize("a transcript long enough for analysis")
            .await
            .unwrap();
        assert_eq!(result, "## Goal\nShip it");
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let client = Arc::new(MockLlmClient::new().with_failure());
        let summarizer = LlmSummarizer::new(client);

        let result = summarizer
            .summarize("a transcript long enough for analysis")
            .await;
        assert!(matches!(result, Err(RecapError::Llm { .. })));
    }

    #[tokio::test]
    async fn test_boundary_length_exactly_ten_chars() {
        let client = Arc::new(MockLlmClient::new().with_response("analyzed"));
        let summarizer = LlmSummarizer::new(client);

        // 10 trimmed chars is long enough; 9 is not.
        assert_eq!(summarizer.summarize("0123456789").await.unwrap(), "analyzed");
        assert_eq!(
            summarizer.summarize("012345678").await.unwrap(),
            defaults::TOO_SHORT_MARKER
        );
    }

    #[tokio::test]
    async fn test_mock_summarizer() {
        let mock = MockSummarizer::new().with_response("custom");
        assert_eq!(mock.summarize("anything").await.unwrap(), "custom");

        let failing = MockSummarizer::new().with_failure();
        assert!(failing.summarize("anything").await.is_err());
    }
}
