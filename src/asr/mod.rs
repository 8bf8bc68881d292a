//! Speech recognition and speaker diarization collaborators.

pub mod diarizer;
pub mod remote;
pub mod transcriber;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use diarizer::{Diarizer, MockDiarizer, SpeakerSegment};
pub use remote::{RemoteDiarizer, RemoteTranscriber};
pub use transcriber::{MockTranscriber, RecognitionSegment, Transcriber, Transcript};
#[cfg(feature = "whisper")]
pub use whisper::{WhisperConfig, WhisperTranscriber};
