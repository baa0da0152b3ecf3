//! In-memory deck state.
//!
//! `DeckState` wraps the persisted [`Deck`] together with an index derived
//! from its attempt history. Transitions never mutate a state in place: they
//! return the next snapshot, which the caller publishes (see [`crate::store`]).

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::types::{
    Attempt, Deck, DeckSummary, Definition, Entry, EntryId, EntryStats, SchedulerConfig, Score,
    Stage,
};

/// Word and definitions supplied by an import provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub word: String,
    pub definitions: Vec<Definition>,
}

/// Outcome of upserting one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Created(EntryId),
    Updated(EntryId),
    Unchanged(EntryId),
}

impl Upsert {
    pub fn entry_id(&self) -> &str {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Counts from a batch import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Derived, non-persisted facts about one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EntryIndex {
    pub attempt_count: usize,
    pub graded_count: usize,
    pub latest_graded_at: Option<DateTime<Utc>>,
    /// Graded time of the latest attempt that moved the schedule.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
}

/// Deck plus derived index.
#[derive(Debug, Clone)]
pub struct DeckState {
    deck: Deck,
    config: SchedulerConfig,
    index: HashMap<EntryId, EntryIndex>,
    by_word: HashMap<String, EntryId>,
}

impl DeckState {
    /// Validate a persisted deck and build its index.
    pub fn load(deck: Deck, config: SchedulerConfig) -> Result<Self> {
        let mut index: HashMap<EntryId, EntryIndex> = HashMap::new();

        for attempt in &deck.attempts {
            let item = index.entry(attempt.entry_id.clone()).or_default();
            item.attempt_count += 1;
            if let Some(graded_at) = attempt.graded_at {
                item.graded_count += 1;
                item.latest_graded_at = max_time(item.latest_graded_at, graded_at);
                if attempt.stage != Stage::Practice {
                    item.scheduled_at = max_time(item.scheduled_at, graded_at);
                }
            }
        }

        for (entry_id, item) in index.iter_mut() {
            if item.graded_count == 0 || !deck.entries.contains_key(entry_id) {
                continue;
            }
            let score = deck
                .scores
                .get(entry_id)
                .ok_or_else(|| CoreError::MissingScore(entry_id.clone()))?;
            let anchor = item.scheduled_at.or(item.latest_graded_at);
            item.due_date = anchor.map(|at| due_date(&config, at, score));
        }

        let by_word = deck
            .entries
            .values()
            .map(|e| (e.word.clone(), e.id.clone()))
            .collect();

        tracing::debug!(
            deck = %deck.id,
            entries = deck.entries.len(),
            attempts = deck.attempts.len(),
            "loaded deck state"
        );

        Ok(Self {
            deck,
            config,
            index,
            by_word,
        })
    }

    /// Hand the persisted record back to the caller.
    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.deck.entries.values()
    }

    pub fn entry(&self, entry_id: &str) -> Option<&Entry> {
        self.deck.entries.get(entry_id)
    }

    pub fn entry_by_word(&self, word: &str) -> Option<&Entry> {
        self.by_word.get(word).and_then(|id| self.deck.entries.get(id))
    }

    pub fn score(&self, entry_id: &str) -> Option<&Score> {
        self.deck.scores.get(entry_id)
    }

    pub fn attempt_count(&self, entry_id: &str) -> usize {
        self.index.get(entry_id).map_or(0, |i| i.attempt_count)
    }

    pub fn latest_graded_at(&self, entry_id: &str) -> Option<DateTime<Utc>> {
        self.index.get(entry_id).and_then(|i| i.latest_graded_at)
    }

    /// Attempts, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &Attempt> {
        self.deck.attempts.iter().rev()
    }

    /// Sequence id for the next attempt.
    pub fn next_attempt_id(&self) -> u64 {
        self.deck.attempts.last().map_or(0, |a| a.id.saturating_add(1))
    }

    pub fn entry_stats(&self, entry_id: &str, now: DateTime<Utc>) -> Option<EntryStats> {
        let entry = self.entry(entry_id)?;
        Some(EntryStats {
            entry_id: entry.id.clone(),
            word: entry.word.clone(),
            attempt_count: self.attempt_count(entry_id),
            latest_graded_at: self.latest_graded_at(entry_id),
            due_date: self.due_date(entry_id),
            stage: self.classify(entry_id, now),
        })
    }

    pub fn summary(&self, now: DateTime<Utc>) -> DeckSummary {
        let counts = self.stage_counts(now);
        DeckSummary {
            id: self.deck.id.clone(),
            name: self.deck.name.clone(),
            entry_count: self.deck.entries.len(),
            new_count: counts.new,
            review_count: counts.review,
            practice_count: counts.practice,
        }
    }

    /// Upsert one entry by word.
    ///
    /// Scores and attempt history are never touched.
    pub fn add_entry(
        &self,
        word: &str,
        definitions: Vec<Definition>,
        now: DateTime<Utc>,
    ) -> (Self, Upsert) {
        let mut next = self.clone();
        let outcome = next.upsert(word, definitions, now);
        (next, outcome)
    }

    /// Upsert a batch of entries.
    pub fn import(
        &self,
        entries: impl IntoIterator<Item = RawEntry>,
        now: DateTime<Utc>,
    ) -> (Self, ImportSummary) {
        let mut next = self.clone();
        let mut summary = ImportSummary::default();

        for raw in entries {
            match next.upsert(&raw.word, raw.definitions, now) {
                Upsert::Created(_) => summary.created += 1,
                Upsert::Updated(_) => summary.updated += 1,
                Upsert::Unchanged(_) => summary.unchanged += 1,
            }
        }

        tracing::info!(
            deck = %next.deck.id,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "imported entries"
        );
        (next, summary)
    }

    fn upsert(&mut self, word: &str, definitions: Vec<Definition>, now: DateTime<Utc>) -> Upsert {
        if let Some(id) = self.by_word.get(word).cloned() {
            if let Some(entry) = self.deck.entries.get_mut(&id) {
                if entry.definitions == definitions {
                    return Upsert::Unchanged(id);
                }
                entry.definitions = definitions;
                entry.updated_at = now;
                return Upsert::Updated(id);
            }
        }

        let id = Uuid::new_v4().to_string();
        self.deck.entries.insert(
            id.clone(),
            Entry {
                id: id.clone(),
                word: word.to_string(),
                definitions,
                created_at: now,
                updated_at: now,
            },
        );
        self.by_word.insert(word.to_string(), id.clone());
        Upsert::Created(id)
    }

    /// Append a graded attempt and, when given, the entry's new score.
    pub(crate) fn with_graded_attempt(&self, attempt: Attempt, score: Option<Score>) -> Self {
        let mut next = self.clone();
        let graded_at = attempt.graded_at;
        let item = next.index.entry(attempt.entry_id.clone()).or_default();

        item.attempt_count += 1;
        if let Some(at) = graded_at {
            item.graded_count += 1;
            item.latest_graded_at = max_time(item.latest_graded_at, at);
        }

        if let (Some(score), Some(at)) = (score, graded_at) {
            item.scheduled_at = Some(at);
            item.due_date = Some(due_date(&next.config, at, &score));
            next.deck.scores.insert(attempt.entry_id.clone(), score);
        }

        next.deck.attempts.push(attempt);
        next
    }

    pub(crate) fn index_of(&self, entry_id: &str) -> Option<&EntryIndex> {
        self.index.get(entry_id)
    }
}

fn max_time(current: Option<DateTime<Utc>>, candidate: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Some(current.map_or(candidate, |c| c.max(candidate)))
}

/// Saturates at the last representable date.
fn due_date(config: &SchedulerConfig, graded_at: DateTime<Utc>, score: &Score) -> NaiveDate {
    config
        .study_day(graded_at)
        .checked_add_days(Days::new(u64::from(score.interval)))
        .unwrap_or(NaiveDate::MAX)
}
