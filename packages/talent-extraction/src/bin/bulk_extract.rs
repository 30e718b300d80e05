//! CLI for running candidate extraction against the simulated sources
//!
//! Output is JSON on stdout; logs go to stderr through `tracing`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use talent_extraction::{
    classify, BulkJobOrchestrator, ExtractionAdapters, JobCallbacks, PipelineConfig, SourceKind,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bulk-extract")]
#[command(about = "Classify and extract candidate sources")]
struct Cli {
    /// Tasks run at once (overrides EXTRACTION_MAX_CONCURRENT)
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,

    /// Admissions per category per minute (overrides EXTRACTION_RATE_LIMIT_PER_MINUTE)
    #[arg(long, global = true)]
    rate_limit: Option<u32>,

    /// Simulated latency per extraction (overrides EXTRACTION_LATENCY_MS)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the platform of each locator
    Classify {
        #[arg(required = true)]
        locators: Vec<String>,
    },

    /// Run a single adapter
    Extract {
        #[arg(long, value_enum)]
        kind: KindArg,
        locator: String,
    },

    /// Submit a batch and wait for it to finish
    Bulk {
        /// File with one locator per line
        #[arg(long)]
        file: Option<PathBuf>,
        locators: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Profile,
    JobBoard,
    Document,
    Image,
    Webpage,
}

impl From<KindArg> for SourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Profile => SourceKind::Profile,
            KindArg::JobBoard => SourceKind::JobBoard,
            KindArg::Document => SourceKind::Document,
            KindArg::Image => SourceKind::Image,
            KindArg::Webpage => SourceKind::Webpage,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,talent_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Classify { locators } => {
            for locator in locators {
                println!("{locator}\t{}", classify(&locator));
            }
        }
        Commands::Extract { kind, locator } => {
            let adapters = ExtractionAdapters::simulated(&config);
            let record = adapters
                .extract(kind.into(), &locator)
                .await
                .with_context(|| format!("Failed to extract {locator}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Bulk { file, mut locators } => {
            if let Some(path) = file {
                locators.extend(read_locators(&path)?);
            }
            if locators.is_empty() {
                bail!("No locators given; pass them as arguments or with --file");
            }

            let orchestrator = BulkJobOrchestrator::from_config(&config);
            let callbacks = JobCallbacks::new().on_progress(|done, total| {
                tracing::info!(done, total, "progress");
            });
            let job_id = orchestrator
                .submit(locators, callbacks)
                .context("Failed to submit bulk job")?;

            let status = orchestrator
                .wait_for_completion(job_id.as_str())
                .await
                .context("Bulk job disappeared")?;
            tracing::info!(
                job_id = %job_id,
                completed = status.completed,
                failed = status.failed,
                "bulk job finished"
            );
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("Failed to load configuration")?;
    if let Some(max_concurrent) = cli.max_concurrent {
        config = config.with_max_concurrent(max_concurrent);
    }
    if let Some(limit) = cli.rate_limit {
        config = config.with_rate_limit_per_minute(limit);
    }
    if let Some(latency) = cli.latency_ms {
        config = config.with_simulated_latency(Duration::from_millis(latency));
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_locators(path: &PathBuf) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
