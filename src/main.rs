//! papertriage - Hugging Face Papers Interest Triage
//!
//! Scrapes the Hugging Face daily-papers listing and asks a locally hosted
//! text-generation-webui instance whether each abstract matches the
//! researcher's interests. A companion scoring mode benchmarks the candidate
//! prompt templates against a labeled dataset.
//!
//! ## Usage
//!
//! ### Classify today's papers
//! ```bash
//! papertriage classify http://127.0.0.1:5000
//! ```
//!
//! ### Benchmark the templates
//! ```bash
//! papertriage score dataset.tsv http://127.0.0.1:5000 --seed 7
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use papertriage::prompts::{default_persona, interest_templates};
use papertriage::textgen::TextgenClient;
use papertriage::{classify, dataset, papers, score};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Hugging Face Papers Interest Triage - LLM Classifier & Prompt Benchmark
#[derive(Parser)]
#[command(name = "papertriage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify today's Hugging Face papers against the researcher profile
    Classify {
        /// text-generation-webui base address (e.g. http://127.0.0.1:5000)
        api_address: String,
    },

    /// Benchmark the candidate templates against a labeled dataset
    Score {
        /// Path to the tab-separated labeled dataset
        dataset: PathBuf,

        /// text-generation-webui base address (e.g. http://127.0.0.1:5000)
        api_address: String,

        /// Template id to skip (repeatable)
        #[arg(long)]
        skip: Vec<String>,

        /// Seed for the evaluation-order shuffle (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Classify { api_address } => run_classify(api_address).await,
        Commands::Score {
            dataset,
            api_address,
            skip,
            seed,
        } => run_score(dataset, api_address, skip, seed).await,
    }
}

// ============================================================================
// Classification Mode
// ============================================================================

async fn run_classify(api_address: String) -> Result<()> {
    let client = TextgenClient::new(&api_address).context("Invalid API address")?;
    let persona = default_persona();
    let templates = interest_templates();
    let template = templates.first().context("No templates defined")?;

    let source = papers::PaperSource::new()?;
    let links = source.list_papers().await.context("Failed to fetch papers listing")?;
    println!("Found {} papers.", links.len());

    for link in &links {
        println!("{}", link);
        let abstract_text = source
            .fetch_abstract(link)
            .await
            .with_context(|| format!("Failed to fetch abstract for {}", link))?;

        let interested = classify::classify(&client, template, &persona, &abstract_text)
            .await
            .with_context(|| format!("Failed to classify {}", link))?;

        println!("{}", interested);
    }

    Ok(())
}

// ============================================================================
// Scoring Mode
// ============================================================================

async fn run_score(
    dataset_path: PathBuf,
    api_address: String,
    skip: Vec<String>,
    seed: Option<u64>,
) -> Result<()> {
    let examples = dataset::load_dataset(&dataset_path)
        .with_context(|| format!("Failed to load dataset {:?}", dataset_path))?;

    // Intermediate dump of the parsed dataset, before any network call
    dataset::dump_dataset(Path::new(dataset::DUMP_PATH), &examples)
        .context("Failed to dump parsed dataset")?;

    let client = TextgenClient::new(&api_address).context("Invalid API address")?;
    let persona = default_persona();
    let templates = interest_templates();
    let skip_ids: HashSet<String> = skip.into_iter().collect();

    let mut rng = match seed {
        Some(seed) => {
            info!(seed = seed, "Using fixed shuffle seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let report = score::score_all(
        &client,
        &templates,
        &persona,
        &examples,
        &skip_ids,
        &mut rng,
    )
    .await
    .context("Scoring run failed")?;

    println!("done!");
    println!("best prompts:");
    for entry in &report {
        println!("{} {} out of {}", entry.template_id, entry.correct, entry.total);
    }

    Ok(())
}
