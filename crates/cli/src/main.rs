//! amlwatch CLI - Main entry point

use amlwatch_cli::{commands, Settings};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amlwatch")]
#[command(about = "amlwatch - Transaction risk scoring and laundering pattern detection", long_about = None)]
struct Cli {
    /// Scoring configuration (JSON)
    #[arg(long, global = true)]
    scoring_config: Option<PathBuf>,

    /// Detection configuration (JSON)
    #[arg(long, global = true)]
    detection_config: Option<PathBuf>,

    /// Reference time (RFC 3339) instead of the wall clock
    #[arg(long, global = true)]
    as_of: Option<DateTime<Utc>>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one transaction against a history file
    Score {
        /// Transaction history (JSONL)
        #[arg(long)]
        history: PathBuf,
        /// Transaction to score (JSON)
        #[arg(long)]
        transaction: PathBuf,
    },

    /// Score every transaction of a batch and summarize
    ScoreBatch {
        /// Transaction history (JSONL)
        #[arg(long)]
        history: PathBuf,
        /// Transactions to score (JSONL)
        #[arg(long)]
        batch: PathBuf,
    },

    /// Detect laundering patterns in a batch
    Patterns {
        /// Batch to analyze (JSONL)
        #[arg(long)]
        batch: PathBuf,
    },

    /// Detect laundering patterns in the recent part of a history file
    Window {
        /// Transaction history (JSONL)
        #[arg(long)]
        history: PathBuf,
        /// Window length in hours
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(i64).range(1..))]
        hours: i64,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings {
        scoring_config: cli.scoring_config,
        detection_config: cli.detection_config,
        as_of: cli.as_of,
    };

    match cli.command {
        Commands::Score {
            history,
            transaction,
        } => {
            let assessment = commands::score(&settings, &history, &transaction).await?;
            print_json(&assessment)?;
        }
        Commands::ScoreBatch { history, batch } => {
            let report = commands::score_batch(&settings, &history, &batch).await?;
            print_json(&report)?;
        }
        Commands::Patterns { batch } => {
            let result = commands::patterns(&settings, &batch).await?;
            print_json(&result)?;
        }
        Commands::Window { history, hours } => {
            let result = commands::window(&settings, &history, hours).await?;
            print_json(&result)?;
        }
    }

    Ok(())
}
