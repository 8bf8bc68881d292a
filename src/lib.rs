//! recapd - call recap service
//!
//! Takes an uploaded call recording through speech recognition, speaker
//! diarization, summarization, and action-item extraction, exposed as an
//! async job API over HTTP.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod asr;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod dialogue;
pub mod error;
pub mod export;
pub mod job;
pub mod llm;
pub mod server;

// Collaborator traits (swap real backends for mocks at the seams)
pub use asr::{Diarizer, Transcriber};
pub use llm::{ActionExtractor, LlmClient, Summarizer};

// Job pipeline
pub use job::{Job, JobFlags, JobQueue, JobStatus, JobStore, StageSequencer};

// Error handling
pub use error::{RecapError, Result};

// Config
pub use config::Config;
