//! Dialogue reconstruction from ASR and diarization output.
//!
//! Two independently segmented time series come out of the ML collaborators:
//! timestamped transcript fragments and speaker-attributed intervals. This
//! module reconciles them into one ordered, speaker-labelled dialogue
//! ([`align`]) and coalesces adjacent same-speaker fragments into whole
//! utterances ([`merge`]).

pub mod align;
pub mod merge;

use serde::{Deserialize, Serialize};

pub use align::align;
pub use merge::merge;

/// One speaker-attributed utterance of the reconstructed dialogue.
///
/// Output of both [`align`] (one entry per surviving recognition segment)
/// and [`merge`] (one entry per maximal same-speaker run). `start`/`end`
/// always carry recognition-segment bounds, not diarization bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueSegment {
    pub speaker: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
}
