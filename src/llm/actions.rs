//! Action-item extraction from call transcripts.

use crate::error::{RecapError, Result};
use crate::llm::client::LlmClient;
use crate::llm::prompt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One extracted action item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    /// `DD.MM` when the transcript gives a date.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Wire shape the extraction prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct ExtractedActions {
    #[serde(default)]
    actions: Vec<ActionItem>,
}

/// Trait for action-item extraction.
#[async_trait::async_trait]
pub trait ActionExtractor: Send + Sync {
    async fn extract(&self, full_text: &str) -> Result<Vec<ActionItem>>;
}

/// LLM-backed action extractor.
pub struct LlmActionExtractor {
    client: Arc<dyn LlmClient>,
}

impl LlmActionExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Pull the JSON object out of a model response.
    ///
    /// Models often wrap JSON in Markdown fences or a sentence of prose;
    /// take everything between the first `{` and the last `}`.
    fn extract_json(response: &str) -> Option<&str> {
        let start = response.find('{')?;
        let end = response.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&response[start..=end])
    }

    fn parse(response: &str) -> Result<Vec<ActionItem>> {
        let json = Self::extract_json(response).ok_or_else(|| RecapError::Llm {
            message: "Action extraction response contained no JSON object".to_string(),
        })?;
        let extracted: ExtractedActions =
            serde_json::from_str(json).map_err(|e| RecapError::Llm {
                message: format!("Failed to parse extracted actions: {e}"),
            })?;
        Ok(extracted.actions)
    }
}

#[async_trait::async_trait]
impl ActionExtractor for LlmActionExtractor {
    async fn extract(&self, full_text: &str) -> Result<Vec<ActionItem>> {
        let response = self.client.complete(&prompt::actions_prompt(full_text)).await?;
        Self::parse(&response)
    }
}

/// Mock action extractor for testing
#[derive(Debug, Clone)]
pub struct MockActionExtractor {
    actions: Vec<ActionItem>,
    should_fail: bool,
}

impl MockActionExtractor {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            should_fail: false,
        }
    }

    pub fn with_actions(mut self, actions: Vec<ActionItem>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockActionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ActionExtractor for MockActionExtractor {
    async fn extract(&self, _full_text: &str) -> Result<Vec<ActionItem>> {
        if self.should_fail {
            Err(RecapError::Llm {
                message: "mock extraction failure".to_string(),
            })
        } else {
            Ok(self.actions.clone())
        }
    }
}
