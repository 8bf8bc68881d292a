use crate::error::{RecapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One timestamped fragment of recognized speech.
///
/// Produced by the ASR collaborator; immutable once produced. Input order is
/// not guaranteed — the aligner sorts by `start` before scanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionSegment {
    /// Segment start in seconds from the beginning of the recording.
    pub start: f64,
    /// Segment end in seconds.
    pub end: f64,
    pub text: String,
}

/// Full transcription result for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// The whole recording as one string, used for summarization and
    /// action extraction.
    pub full_text: String,
    pub segments: Vec<RecognitionSegment>,
}

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (local Whisper vs mock).
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file to timestamped text segments.
    async fn transcribe(&self, audio: &Path) -> Result<Transcript>;

    /// Name of the loaded model, for logging.
    fn model_name(&self) -> &str;
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    transcript: Transcript,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber returning an empty transcript.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            transcript: Transcript {
                full_text: String::new(),
                segments: Vec::new(),
            },
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific transcript.
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// Configure the mock with segments; full text is their concatenation.
    pub fn with_segments(mut self, segments: Vec<RecognitionSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        self.transcript = Transcript {
            full_text,
            segments,
        };
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &Path) -> Result<Transcript> {
        if self.should_fail {
            Err(RecapError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.transcript.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
