//! Whisper-based speech-to-text transcription.
//!
//! Local implementation of the [`Transcriber`] trait using whisper-rs.
//!
//! # Feature Gate
//!
//! This module requires the `whisper` feature and cmake to build:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::asr::transcriber::{RecognitionSegment, Transcriber, Transcript};
use crate::defaults;
use crate::error::{RecapError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file
    pub model_path: PathBuf,
    /// Language code (e.g. "en", "ru") or "auto"
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(defaults::MODEL_PATH),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Whisper-based transcriber implementation.
///
/// The WhisperContext is wrapped in a Mutex: whisper.cpp states must not run
/// concurrently on one context, so concurrent jobs serialize here.
pub struct WhisperTranscriber {
    context: Arc<Mutex<WhisperContext>>,
    config: WhisperConfig,
    model_name: String,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Errors
    /// Returns `RecapError::TranscriptionModelNotFound` if the model file
    /// does not exist, `RecapError::Transcription` if loading fails.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(RecapError::TranscriptionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let context_params = WhisperContextParameters::default();
        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| RecapError::Transcription {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            context_params,
        )
        .map_err(|e| RecapError::Transcription {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Arc::new(Mutex::new(context)),
            config,
            model_name,
        })
    }

    /// Read a WAV file into f32 mono samples for Whisper.
    ///
    /// Whisper expects 16 kHz mono f32 in [-1.0, 1.0]. Multichannel input is
    /// downmixed by averaging; resampling is out of scope, so a wrong sample
    /// rate is an error.
    fn read_samples(path: &Path) -> Result<Vec<f32>> {
        let reader = hound::WavReader::open(path).map_err(|e| RecapError::Transcription {
            message: format!("Failed to read WAV file: {}", e),
        })?;
        let spec = reader.spec();

        if spec.sample_rate != 16_000 {
            return Err(RecapError::Transcription {
                message: format!(
                    "Expected 16 kHz audio, got {} Hz (resample before upload)",
                    spec.sample_rate
                ),
            });
        }

        let channels = spec.channels as usize;
        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .into_samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| RecapError::Transcription {
                    message: format!("Failed to decode WAV samples: {}", e),
                })?,
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| RecapError::Transcription {
                    message: format!("Failed to decode WAV samples: {}", e),
                })?,
        };

        if channels <= 1 {
            return Ok(interleaved);
        }

        Ok(interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect())
    }

    fn run_inference(
        context: &Arc<Mutex<WhisperContext>>,
        config: &WhisperConfig,
        samples: &[f32],
    ) -> Result<Transcript> {
        let context = context.lock().map_err(|e| RecapError::Transcription {
            message: format!("Failed to acquire context lock: {}", e),
        })?;

        let mut state = context.create_state().map_err(|e| RecapError::Transcription {
            message: format!("Failed to create Whisper state: {}", e),
        })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if config.language == defaults::DEFAULT_LANGUAGE {
            params.set_language(None);
        } else {
            params.set_language(Some(&config.language));
        }
        if let Some(threads) = config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| RecapError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let mut full_text = String::new();
        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let text = segment.to_string();
            full_text.push_str(&text);
            segments.push(RecognitionSegment {
                // whisper.cpp timestamps are centiseconds
                start: segment.start_timestamp() as f64 / 100.0,
                end: segment.end_timestamp() as f64 / 100.0,
                text,
            });
        }

        Ok(Transcript {
            full_text: full_text.trim().to_string(),
            segments,
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        let samples = Self::read_samples(audio)?;
        let context = Arc::clone(&self.context);
        let config = self.config.clone();

        // Inference is CPU-bound and can run for minutes on long calls; keep
        // it off the async worker threads.
        tokio::task::spawn_blocking(move || Self::run_inference(&context, &config, &samples))
            .await
            .map_err(|e| RecapError::Transcription {
                message: format!("Inference task failed: {}", e),
            })?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
