//! Error types for recapd.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecapError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Boundary input errors
    #[error("Unsupported audio format: {filename}")]
    UnsupportedFormat { filename: String },

    // Collaborator errors (fatal for the running job)
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Diarization failed: {message}")]
    Diarization { message: String },

    #[error("LLM request failed: {message}")]
    Llm { message: String },

    // Job lifecycle
    #[error("Job not found: {id}")]
    JobNotFound { id: String },

    #[error("Job queue is full")]
    QueueFull,

    /// Raised by the sequencer when it observes a cancellation request at a
    /// stage boundary, so the in-flight run unwinds like any other fault.
    #[error("Job cancelled")]
    Cancelled,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RecapError>;

impl RecapError {
    /// True for the terminal job faults the sequencer reports as `error`.
    /// Cancellation is excluded: it finalizes the job without an error payload.
    pub fn is_collaborator_fault(&self) -> bool {
        matches!(
            self,
            RecapError::Transcription { .. }
                | RecapError::TranscriptionModelNotFound { .. }
                | RecapError::Diarization { .. }
                | RecapError::Llm { .. }
        )
    }
}
