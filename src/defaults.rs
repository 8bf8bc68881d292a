//! Default configuration constants for recapd.
//!
//! Shared constants used across configuration types to keep defaults in one
//! place.

/// Default HTTP bind address.
pub const BIND_ADDR: &str = "127.0.0.1:8750";

/// Default number of concurrent pipeline workers.
///
/// ASR and diarization are memory-heavy; two concurrent calls is a safe
/// default on a single-node deployment. Tune upward on larger hosts.
pub const MAX_CONCURRENT_JOBS: usize = 2;

/// Default submission queue capacity.
///
/// Submissions beyond this are rejected with a backpressure error instead of
/// growing without bound.
pub const QUEUE_CAPACITY: usize = 16;

/// Default Whisper model path.
pub const MODEL_PATH: &str = "models/ggml-base.bin";

/// Default transcription sidecar endpoint.
pub const ASR_ENDPOINT: &str = "http://127.0.0.1:8752";

/// Default language code for transcription.
///
/// "auto" lets Whisper detect the spoken language automatically.
pub const DEFAULT_LANGUAGE: &str = "auto";

/// Default diarization sidecar endpoint.
pub const DIARIZATION_ENDPOINT: &str = "http://127.0.0.1:8751";

/// Default Ollama endpoint.
pub const OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";

/// Default OpenAI-compatible endpoint (LM Studio's default port).
pub const OPENAI_BASE_URL: &str = "http://127.0.0.1:1234/v1";

/// Default LLM model name.
pub const LLM_MODEL: &str = "llama3";

/// Sampling temperature for summarization and action extraction.
///
/// f64 so it serializes to JSON as written (0.2, not an f32 rounding
/// artifact).
pub const LLM_TEMPERATURE: f64 = 0.2;

/// Alignment tolerance in seconds.
///
/// A recognition segment may be matched to a diarization interval it does
/// not strictly overlap, as long as the gap is within this window.
pub const ALIGN_TOLERANCE: f64 = 0.1;

/// Minimum trimmed transcript length worth sending to the LLM.
///
/// Shorter transcripts return [`TOO_SHORT_MARKER`] without invoking the
/// model.
pub const MIN_SUMMARY_INPUT_CHARS: usize = 10;

/// Fixed response for transcripts below [`MIN_SUMMARY_INPUT_CHARS`].
pub const TOO_SHORT_MARKER: &str = "Text is too short for analysis";

/// Audio file extensions accepted at the upload boundary.
///
/// Decoding is the collaborators' concern; this is only a cheap reject of
/// obviously wrong uploads before a job is created.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a"];
