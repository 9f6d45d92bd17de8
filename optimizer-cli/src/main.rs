use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, info};

use optimizer_cli::answers;
use optimizer_cli::batch::run_batch;
use optimizer_cli::config::{AppConfig, ConfigOverrides};
use optimizer_cli::logging::{init_logging, log_task_error};
use optimizer_cli::session::Session;
use optimizer_core::TaxBackend;
use optimizer_core::backend::BackendRegistry;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tax Return Optimizer.
///
/// Walks through a short questionnaire and prints an estimated tax summary
/// with savings recommendations.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file. Missing means defaults.
    #[arg(long, default_value = "tax-optimizer.toml")]
    config: PathBuf,

    /// Computation backend to use.
    #[arg(long)]
    backend: Option<String>,

    /// Artificial latency of the simulated backend, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Run every row of this CSV answers file instead of prompting.
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `optimizer_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?
        .apply_overrides(ConfigOverrides {
            backend: cli.backend,
            delay_ms: cli.delay_ms,
            log_level: cli.log_level,
            log_file: cli.log_file,
        });

    init_logging(&config.logging)?;
    debug!(?config, "configuration loaded");

    let registry = BackendRegistry::with_builtin();
    let backend = registry.create(&config.backend).await?;
    info!(backend = backend.name(), "backend ready");

    let result = match cli.answers {
        Some(path) => run_answers_file(&path, backend, config.upload.max_bytes).await,
        None => {
            let input = BufReader::new(tokio::io::stdin());
            let mut session = Session::new(backend, config.upload.max_bytes, input, std::io::stdout());
            session.run().await
        }
    };

    log_task_error("wizard", &result);
    result
}

async fn run_answers_file(
    path: &Path,
    backend: Arc<dyn TaxBackend>,
    upload_limit_bytes: u64,
) -> anyhow::Result<()> {
    let records = answers::load_from_file(path)?;
    info!(rows = records.len(), path = %path.display(), "answers loaded");

    let summary = run_batch(records, backend, upload_limit_bytes, &mut std::io::stdout()).await?;
    if summary.failed > 0 {
        anyhow::bail!("{} of {} rows failed", summary.failed, summary.completed + summary.failed);
    }
    Ok(())
}
