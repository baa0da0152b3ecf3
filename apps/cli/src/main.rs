mod commands;
mod config;
mod storage;
mod study;
mod wordlist;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::StudyMode;

use crate::commands::App;
use crate::config::AppConfig;

/// Spaced-repetition vocabulary drill.
#[derive(Debug, Parser)]
#[command(name = "vocab-drill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List decks with their stage counts
    List,
    /// Create an empty deck and print its id
    Create { name: String },
    /// Merge a word-list file into a deck
    Import { deck: String, file: PathBuf },
    /// Run a study session
    Study {
        deck: String,
        /// Drill entries that are not yet due, without touching the schedule
        #[arg(long)]
        practice: bool,
    },
    /// Show per-entry statistics
    Stats { deck: String },
    /// Show attempts, most recent first
    History {
        deck: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    tracing::debug!(decks_dir = %config.decks_dir.display(), "loaded configuration");

    let app = App::new(config);
    match cli.command {
        Command::List => app.list(),
        Command::Create { name } => app.create(&name).map(|_| ()),
        Command::Import { deck, file } => app.import(&deck, &file),
        Command::Study { deck, practice } => {
            let mode = if practice {
                StudyMode::Practice
            } else {
                StudyMode::Study
            };
            app.study(&deck, mode)
        }
        Command::Stats { deck } => app.stats(&deck),
        Command::History { deck, limit } => app.history(&deck, limit),
    }
}
