//! Command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use uuid::Uuid;
use vocab_core::{
    build_queue, Clock, Deck, DeckRepository, DeckState, Store, StudyMode, StudySession,
    SystemClock,
};

use crate::config::AppConfig;
use crate::storage::{JsonDeckRepository, StorageError};
use crate::study::{self, Outcome, SaveFailure};
use crate::wordlist;

pub struct App {
    config: AppConfig,
    repo: JsonDeckRepository,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let repo = JsonDeckRepository::new(&config.decks_dir);
        Self {
            config,
            repo,
            clock: Arc::new(SystemClock),
        }
    }

    fn load_state(&self, deck_id: &str) -> anyhow::Result<DeckState> {
        let deck = self
            .repo
            .load(deck_id)?
            .ok_or_else(|| StorageError::DeckNotFound(deck_id.to_string()))?;
        Ok(DeckState::load(deck, self.config.scheduler)?)
    }

    /// Print one summary line per deck.
    pub fn list(&self) -> anyhow::Result<()> {
        let now = self.clock.now();
        let ids = self.repo.list_ids()?;
        if ids.is_empty() {
            println!("No decks in {}", self.repo.dir().display());
            return Ok(());
        }

        for id in ids {
            let summary = self.load_state(&id)?.summary(now);
            println!(
                "{}  {}  entries={} new={} review={} practice={}",
                summary.id,
                summary.name,
                summary.entry_count,
                summary.new_count,
                summary.review_count,
                summary.practice_count
            );
        }
        Ok(())
    }

    pub fn create(&self, name: &str) -> anyhow::Result<String> {
        let id = Uuid::now_v7().to_string();
        let deck = Deck::new(id.clone(), name, self.clock.now());
        self.repo.save(&deck)?;
        tracing::info!(deck = %id, name, "created deck");
        println!("{id}");
        Ok(id)
    }

    pub fn import(&self, deck_id: &str, file: &Path) -> anyhow::Result<()> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let raw = wordlist::parse(&content)
            .with_context(|| format!("failed to parse {}", file.display()))?;

        let state = self.load_state(deck_id)?;
        let (state, summary) = state.import(raw, self.clock.now());
        self.repo.save(state.deck())?;

        println!(
            "created={} updated={} unchanged={}",
            summary.created, summary.updated, summary.unchanged
        );
        Ok(())
    }

    pub fn study(&self, deck_id: &str, mode: StudyMode) -> anyhow::Result<()> {
        let state = self.load_state(deck_id)?;
        let queue = build_queue(&state, mode, self.clock.now(), &mut rand::rng());
        if queue.is_empty() {
            println!("Nothing to study right now.");
            return Ok(());
        }

        let mut store = Store::new(state);
        let repo = self.repo.clone();
        let failure = SaveFailure::default();
        let slot = failure.clone();
        store.subscribe(move |state: &DeckState| {
            if let Err(err) = repo.save(state.deck()) {
                tracing::error!(deck = %state.deck().id, %err, "failed to save deck");
                *slot.borrow_mut() = Some(err.into());
            }
        });

        let mut session = StudySession::new(mode, queue, self.clock.clone());
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        let outcome = study::run(&mut store, &mut session, &failure, &mut input, &mut out)?;

        let (label, stats) = match outcome {
            Outcome::Completed(stats) => ("Session complete", stats),
            Outcome::Quit(stats) => ("Session ended", stats),
        };
        writeln!(
            out,
            "\n{label}: new={} review={} practice={}",
            stats.new, stats.review, stats.practice
        )?;
        Ok(())
    }

    pub fn stats(&self, deck_id: &str) -> anyhow::Result<()> {
        let state = self.load_state(deck_id)?;
        let now = self.clock.now();

        for entry in state.entries() {
            let Some(stats) = state.entry_stats(&entry.id, now) else {
                continue;
            };
            println!(
                "{:<20} {}  attempts={} last={} due={} {:?}",
                stats.word,
                stats.entry_id,
                stats.attempt_count,
                stats
                    .latest_graded_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".into()),
                stats
                    .due_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
                stats.stage
            );
        }
        Ok(())
    }

    pub fn history(&self, deck_id: &str, limit: Option<usize>) -> anyhow::Result<()> {
        if limit == Some(0) {
            bail!("--limit must be at least 1");
        }
        let state = self.load_state(deck_id)?;

        for attempt in state.history().take(limit.unwrap_or(usize::MAX)) {
            let word = state
                .entry(&attempt.entry_id)
                .map_or("<removed>", |e| e.word.as_str());
            println!(
                "#{:<5} {:<20} {:?} grade={} graded={}",
                attempt.id,
                word,
                attempt.stage,
                attempt
                    .grade
                    .map(|g| g.value().to_string())
                    .unwrap_or_else(|| "-".into()),
                attempt
                    .graded_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".into()),
            );
        }
        Ok(())
    }
}
