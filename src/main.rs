use anyhow::{Context, Result};
use clap::Parser;
use recapd::asr::{RemoteDiarizer, RemoteTranscriber, Transcriber};
use recapd::cli::{Cli, Commands};
use recapd::config::{AsrBackend, Config};
use recapd::job::{spawn_workers, Collaborators, JobStore, StageSequencer};
use recapd::llm::{build_client, LlmActionExtractor, LlmSummarizer};
use recapd::server::{build_router, AppState};
use recapd::JobFlags;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Default configuration file looked up when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "recapd.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    match cli.command {
        Some(Commands::CheckConfig) => {
            config.validate()?;
            println!("configuration ok");
            Ok(())
        }
        None => serve(config).await,
    }
}

/// Load config from an explicit path, the default path if present, or
/// built-in defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Config::load(default).context("failed to load recapd.toml")
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn build_transcriber(config: &Config) -> Result<Arc<dyn Transcriber>> {
    match config.asr.backend {
        AsrBackend::Remote => Ok(Arc::new(RemoteTranscriber::new(
            &config.asr.endpoint,
            &config.asr.language,
        ))),
        #[cfg(feature = "whisper")]
        AsrBackend::Whisper => {
            let transcriber = recapd::asr::WhisperTranscriber::new(recapd::asr::WhisperConfig {
                model_path: config.asr.model_path.clone().into(),
                language: config.asr.language.clone(),
                threads: None,
            })?;
            Ok(Arc::new(transcriber))
        }
        #[cfg(not(feature = "whisper"))]
        AsrBackend::Whisper => anyhow::bail!(
            "asr.backend = \"whisper\" requires a build with the `whisper` feature"
        ),
    }
}

async fn serve(config: Config) -> Result<()> {
    let transcriber = build_transcriber(&config)?;
    tracing::info!(model = transcriber.model_name(), "transcriber ready");

    let llm = build_client(&config.llm);
    let collaborators = Arc::new(Collaborators {
        transcriber,
        diarizer: Arc::new(RemoteDiarizer::new(&config.diarization.endpoint)),
        summarizer: Arc::new(LlmSummarizer::new(Arc::clone(&llm))),
        action_extractor: Arc::new(LlmActionExtractor::new(llm)),
    });

    let store = Arc::new(JobStore::new());
    let sequencer = Arc::new(StageSequencer::new(
        Arc::clone(&store),
        collaborators,
        config.pipeline.tolerance,
    ));
    let queue = spawn_workers(
        config.server.max_concurrent_jobs,
        config.server.queue_capacity,
        sequencer,
    );

    let app = build_router(AppState {
        store,
        queue,
        default_flags: JobFlags {
            summary: config.pipeline.summary,
            dialogue: config.pipeline.dialogue,
            actions: config.pipeline.actions,
        },
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(
        addr = %config.server.bind_addr,
        workers = config.server.max_concurrent_jobs,
        "recapd listening"
    );
    axum::serve(listener, app).await.context("server error")
}
