//! HTTP-backed recognition and diarization collaborators.
//!
//! Both ASR and diarization can run in sidecar services; these clients
//! upload the audio file and decode the structured response. There is no
//! request timeout here: a pass over a long call legitimately takes minutes,
//! and the job-level contract is that a stuck collaborator blocks its worker
//! until it returns.

use crate::asr::diarizer::{Diarizer, SpeakerSegment};
use crate::asr::transcriber::{Transcriber, Transcript};
use crate::error::{RecapError, Result};
use std::path::Path;

async fn audio_form(audio: &Path) -> std::io::Result<reqwest::multipart::Form> {
    let bytes = tokio::fs::read(audio).await?;
    let filename = audio
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.wav")
        .to_string();
    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
    Ok(reqwest::multipart::Form::new().part("file", part))
}

/// Transcriber that delegates to a remote sidecar over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteTranscriber {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

impl RemoteTranscriber {
    pub fn new(endpoint: &str, language: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/transcribe", self.endpoint)
    }
}

#[async_trait::async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        let form = audio_form(audio)
            .await
            .map_err(|e| RecapError::Transcription {
                message: format!("failed to read audio file: {e}"),
            })?
            .text("language", self.language.clone());

        let response = self
            .client
            .post(self.url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecapError::Transcription {
                message: format!("sidecar request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(RecapError::Transcription {
                message: format!("sidecar returned status {}", response.status()),
            });
        }

        let transcript: Transcript =
            response.json().await.map_err(|e| RecapError::Transcription {
                message: format!("failed to parse sidecar response: {e}"),
            })?;

        Ok(transcript)
    }

    fn model_name(&self) -> &str {
        "remote"
    }
}

/// Diarizer that delegates to a remote sidecar over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteDiarizer {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteDiarizer {
    /// Create a client for the sidecar at `endpoint` (no trailing slash).
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/diarize", self.endpoint)
    }
}

#[async_trait::async_trait]
impl Diarizer for RemoteDiarizer {
    async fn diarize(&self, audio: &Path) -> Result<Vec<SpeakerSegment>> {
        let form = audio_form(audio)
            .await
            .map_err(|e| RecapError::Diarization {
                message: format!("failed to read audio file: {e}"),
            })?;

        let response = self
            .client
            .post(self.url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecapError::Diarization {
                message: format!("sidecar request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(RecapError::Diarization {
                message: format!("sidecar returned status {}", response.status()),
            });
        }

        let segments: Vec<SpeakerSegment> =
            response.json().await.map_err(|e| RecapError::Diarization {
                message: format!("failed to parse sidecar response: {e}"),
            })?;

        Ok(segments)
    }
}
