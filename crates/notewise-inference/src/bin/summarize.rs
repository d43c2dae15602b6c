//! notewise-summarize: generate a summary and tags for a note file.
//!
//! Usage:
//!   notewise-summarize notes/meeting.md
//!   notewise-summarize notes/meeting.md --summary-only --title "주간 회의"
//!   NOTEWISE_GEN_MODEL=qwen3:8b notewise-summarize notes/trip.txt --tags-only
//!
//! Prints one JSON document with each operation's result and final status
//! snapshot. Exits non-zero if any operation failed.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notewise_inference::{
    AiErrorInfo, AiProcessor, AiStatusTracker, GenerationBackend, InferenceConfig, OllamaBackend,
};

#[derive(Parser)]
#[command(name = "notewise-summarize")]
#[command(author, version, about = "Generate an AI summary and tags for a note")]
struct Cli {
    /// Note file to process
    file: PathBuf,

    /// Note title (default: file name)
    #[arg(short, long)]
    title: Option<String>,

    /// Only generate the summary
    #[arg(long, conflicts_with = "tags_only")]
    summary_only: bool,

    /// Only generate tags
    #[arg(long)]
    tags_only: bool,

    /// Override the generation model
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested operation succeeded.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = InferenceConfig::load().context("loading inference config")?;
    if let Some(model) = cli.model {
        config.ollama.model = model;
    }

    let content = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let title = cli.title.unwrap_or_else(|| {
        cli.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let backend = OllamaBackend::from_config(&config.ollama)?;
    if !backend.health_check().await? {
        warn!(url = backend.base_url(), "Ollama health check failed; trying anyway");
    }
    let processor = AiProcessor::new(backend, config.processing);

    let mut output = serde_json::Map::new();
    let mut all_ok = true;

    if !cli.tags_only {
        // One tracker per operation.
        let mut tracker = AiStatusTracker::new();
        let result = processor.summarize_text(&title, &content, &mut tracker).await;
        all_ok &= result.is_ok();
        output.insert(
            "summary".to_string(),
            operation_json(result.map(serde_json::Value::from), &tracker)?,
        );
    }

    if !cli.summary_only {
        let mut tracker = AiStatusTracker::new();
        let result = processor.tag_text(&title, &content, &mut tracker).await;
        all_ok &= result.is_ok();
        output.insert(
            "tags".to_string(),
            operation_json(result.map(serde_json::Value::from), &tracker)?,
        );
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(all_ok)
}

fn operation_json(
    result: Result<serde_json::Value, AiErrorInfo>,
    tracker: &AiStatusTracker,
) -> anyhow::Result<serde_json::Value> {
    let (value, error) = match result {
        Ok(value) => (value, serde_json::Value::Null),
        Err(info) => (serde_json::Value::Null, serde_json::to_value(info)?),
    };
    Ok(serde_json::json!({
        "result": value,
        "error": error,
        "status": tracker.state(),
    }))
}

/// Initialize tracing on stderr (stdout carries the JSON result).
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, replaces stderr output)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: info for the notewise crates)
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "notewise_core=info,notewise_inference=info,notewise_summarize=info".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notewise-summarize.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}
