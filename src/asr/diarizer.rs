use crate::error::{RecapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One speaker-attributed time interval from diarization.
///
/// Speaker labels are opaque identifiers ("SPEAKER_00", ...) and are stable
/// only within one call — the same voice gets a different label on the next
/// recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

/// Trait for speaker diarization.
#[async_trait::async_trait]
pub trait Diarizer: Send + Sync {
    /// Partition an audio file into speaker-attributed intervals.
    ///
    /// The returned segments are not guaranteed to be ordered.
    async fn diarize(&self, audio: &Path) -> Result<Vec<SpeakerSegment>>;
}

/// Mock diarizer for testing
#[derive(Debug, Clone)]
pub struct MockDiarizer {
    segments: Vec<SpeakerSegment>,
    should_fail: bool,
}

impl MockDiarizer {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            should_fail: false,
        }
    }

    /// Configure the mock to return specific segments.
    pub fn with_segments(mut self, segments: Vec<SpeakerSegment>) -> Self {
        self.segments = segments;
        self
    }

    /// Configure the mock to fail on diarize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockDiarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Diarizer for MockDiarizer {
    async fn diarize(&self, _audio: &Path) -> Result<Vec<SpeakerSegment>> {
        if self.should_fail {
            Err(RecapError::Diarization {
                message: "mock diarization failure".to_string(),
            })
        } else {
            Ok(self.segments.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_mock_returns_segments() {
        let diarizer = MockDiarizer::new().with_segments(vec![SpeakerSegment {
            start: 0.0,
            end: 4.0,
            speaker: "SPEAKER_00".to_string(),
        }]);

        let result = diarizer.diarize(&PathBuf::from("call.wav")).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].speaker, "SPEAKER_00");
    }

    #[tokio::test]
    async fn test_mock_empty_by_default() {
        let diarizer = MockDiarizer::new();
        let result = diarizer.diarize(&PathBuf::from("call.wav")).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let diarizer = MockDiarizer::new().with_failure();
        let result = diarizer.diarize(&PathBuf::from("call.wav")).await;
        assert!(matches!(result, Err(RecapError::Diarization { .. })));
    }

    #[test]
    fn test_speaker_segment_serde() {
        let s = SpeakerSegment {
            start: 0.0,
            end: 6.5,
            speaker: "SPEAKER_01".to_string(),
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: SpeakerSegment = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
