//! Configuration from the environment.

use anyhow::{bail, Context};
use std::path::PathBuf;
use vocab_core::SchedulerConfig;

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub decks_dir: PathBuf,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let decks_dir = lookup("VOCAB_DECKS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_decks_dir);

        let mut scheduler = SchedulerConfig::local();

        if let Some(raw) = lookup("VOCAB_NEW_CARDS_PER_DAY") {
            scheduler.new_cards_per_day = raw
                .trim()
                .parse()
                .with_context(|| format!("VOCAB_NEW_CARDS_PER_DAY is not a number: {raw}"))?;
        }

        if let Some(raw) = lookup("VOCAB_DAILY_RESET_HOUR") {
            let hour: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("VOCAB_DAILY_RESET_HOUR is not a number: {raw}"))?;
            if hour > 23 {
                bail!("VOCAB_DAILY_RESET_HOUR must be 0-23, got {hour}");
            }
            scheduler.daily_reset_hour = hour;
        }

        Ok(Self {
            decks_dir,
            scheduler,
        })
    }
}

fn default_decks_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-drill")
        .join("decks")
}
