//! Command-line interface for recapd
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Call recap service: transcription, diarization, summarization over HTTP
#[derive(Parser, Debug)]
#[command(name = "recapd", version, about = "Call recap service")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bind address override (e.g. 0.0.0.0:8750)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the configuration, then exit
    CheckConfig,
}
