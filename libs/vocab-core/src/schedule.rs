//! Stage classification.
//!
//! Stages are re-derived from the deck at query time:
//! - `New`: no graded attempts.
//! - `Review`: graded, and the due date's midnight has passed.
//! - `Practice`: graded, due date still ahead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::DeckState;
use crate::types::{EntryId, Stage};

/// Number of entries per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub new: usize,
    pub review: usize,
    pub practice: usize,
}

impl StageCounts {
    pub fn increment(&mut self, stage: Stage) {
        match stage {
            Stage::New => self.new += 1,
            Stage::Review => self.review += 1,
            Stage::Practice => self.practice += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.review + self.practice
    }
}

impl DeckState {
    /// Date on which the entry becomes due, if it has ever been graded.
    pub fn due_date(&self, entry_id: &str) -> Option<NaiveDate> {
        self.index_of(entry_id).and_then(|i| i.due_date)
    }

    /// Current stage of an entry.
    pub fn classify(&self, entry_id: &str, now: DateTime<Utc>) -> Stage {
        let graded = self.index_of(entry_id).map_or(0, |i| i.graded_count);
        if graded == 0 {
            return Stage::New;
        }

        let due = match self.due_date(entry_id) {
            Some(due) => due,
            None => panic!("entry {entry_id} has graded attempts but no score"),
        };

        if due <= self.config().study_day(now) {
            Stage::Review
        } else {
            Stage::Practice
        }
    }

    /// Entry IDs in the given stage, in ID order.
    pub fn entries_in_stage(&self, stage: Stage, now: DateTime<Utc>) -> Vec<EntryId> {
        self.entries()
            .filter(|e| self.classify(&e.id, now) == stage)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn stage_counts(&self, now: DateTime<Utc>) -> StageCounts {
        let mut counts = StageCounts::default();
        for entry in self.entries() {
            counts.increment(self.classify(&entry.id, now));
        }
        counts
    }
}
