use crate::defaults;
use crate::error::{RecapError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub asr: AsrConfig,
    pub diarization: DiarizationConfig,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

/// HTTP server and worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Number of concurrent pipeline workers.
    pub max_concurrent_jobs: usize,
    /// Submissions beyond this many queued jobs are rejected.
    pub queue_capacity: usize,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AsrConfig {
    pub backend: AsrBackend,
    /// Sidecar endpoint; used by the `remote` backend.
    pub endpoint: String,
    /// GGML model path; used by the `whisper` backend.
    pub model_path: String,
    pub language: String,
}

/// Where transcription runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AsrBackend {
    /// Whisper-style sidecar service over HTTP.
    #[default]
    Remote,
    /// In-process whisper.cpp; needs the `whisper` build feature.
    Whisper,
}

/// Speaker diarization sidecar configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiarizationConfig {
    pub endpoint: String,
}

/// LLM backend selection for summarization and action extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// Which LLM API flavor to talk to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LlmBackend {
    #[default]
    Ollama,
    /// Any OpenAI-compatible chat completions endpoint (LM Studio, vLLM, ...).
    Openai,
}

/// Pipeline tuning and default feature flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Alignment tolerance in seconds.
    pub tolerance: f64,
    pub summary: bool,
    pub dialogue: bool,
    pub actions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR.to_string(),
            max_concurrent_jobs: defaults::MAX_CONCURRENT_JOBS,
            queue_capacity: defaults::QUEUE_CAPACITY,
        }
    }
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            backend: AsrBackend::Remote,
            endpoint: defaults::ASR_ENDPOINT.to_string(),
            model_path: defaults::MODEL_PATH.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DIARIZATION_ENDPOINT.to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            model: defaults::LLM_MODEL.to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: defaults::ALIGN_TOLERANCE,
            summary: true,
            dialogue: true,
            actions: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecapError::ConfigFileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_concurrent_jobs == 0 {
            return Err(RecapError::ConfigInvalidValue {
                key: "server.max_concurrent_jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.server.queue_capacity == 0 {
            return Err(RecapError::ConfigInvalidValue {
                key: "server.queue_capacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.pipeline.tolerance < 0.0 {
            return Err(RecapError::ConfigInvalidValue {
                key: "pipeline.tolerance".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
