//! faqsift CLI - Select FAQ candidate subclusters from ticket embeddings.
//!
//! # Usage
//!
//! ```bash
//! # Write the selection artifact to stdout
//! faqsift --input embeddings.jsonl
//!
//! # Custom config, artifact to a file, summary on the terminal
//! faqsift -i embeddings.jsonl -c faqsift.toml -o selection.json
//!
//! # Override a few settings
//! faqsift -i embeddings.jsonl --top-n 20 --seed 7 --reduced-dim 10
//! ```

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use faqsift_core::{artifact, dataset, SelectionPipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// faqsift subcluster selection CLI.
///
/// Partitions parent clusters of ticket embeddings into subclusters, scores
/// them and writes the top-ranked ones as a JSON selection artifact.
#[derive(Parser)]
#[command(name = "faqsift", version, about)]
struct Cli {
    /// JSON Lines dataset of ticket embeddings
    #[arg(short, long)]
    input: PathBuf,

    /// TOML config file (default: $FAQSIFT_CONFIG, then platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the artifact to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of subclusters to keep
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Project embeddings to this many dimensions per parent cluster
    #[arg(long)]
    reduced_dim: Option<usize>,

    /// Representatives per selected subcluster
    #[arg(long)]
    representatives: Option<usize>,

    /// Word budget for representative summaries and resolutions
    #[arg(long)]
    word_budget: Option<usize>,

    /// Print a human-readable summary (replaces the artifact on stdout)
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the artifact can be piped from stdout
    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = config::Overrides {
        top_n: cli.top_n,
        random_seed: cli.seed,
        reduced_dim: cli.reduced_dim,
        representatives: cli.representatives,
        word_budget: cli.word_budget,
    };
    let selection_config = overrides.apply(config::load_config(cli.config.as_deref())?)?;

    let records = dataset::load_records(&cli.input)
        .with_context(|| format!("Failed to load dataset: {}", cli.input.display()))?;

    let pipeline = SelectionPipeline::new(selection_config)?;
    let report = pipeline.run_with_progress(records, |progress| {
        if progress.parents_completed == 0 {
            return;
        }
        if progress.is_complete() {
            info!(
                "Processed all {} parent clusters in {} ms",
                progress.parents_total, progress.elapsed_ms
            );
        } else {
            info!(
                eta_ms = ?progress.estimated_remaining_ms(),
                "Processed {}/{} parent clusters ({:.0}%)",
                progress.parents_completed,
                progress.parents_total,
                progress.percent_complete()
            );
        }
    });

    match &cli.output {
        Some(path) => {
            artifact::save_artifact(&report, path)
                .with_context(|| format!("Failed to write artifact: {}", path.display()))?;
            if cli.summary {
                println!("{}", output::format_human(&report));
            }
        }
        None => {
            let rendered = if cli.summary {
                output::format_human(&report)
            } else {
                output::format_json(&report).context("Failed to serialize artifact")?
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}
