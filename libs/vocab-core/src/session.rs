//! One study session over a prebuilt queue.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::clock::Clock;
use crate::deck::DeckState;
use crate::error::Result;
use crate::recorder::{AttemptRecorder, Graded};
use crate::schedule::StageCounts;
use crate::types::{Attempt, EntryId, StudyMode};

/// Consumes a queue one entry at a time.
///
/// Graded entries leave the queue and are never re-inserted, even if their
/// stage changes during the session.
pub struct StudySession {
    mode: StudyMode,
    queue: VecDeque<EntryId>,
    recorder: AttemptRecorder,
    stats: StageCounts,
}

impl StudySession {
    pub fn new(mode: StudyMode, queue: Vec<EntryId>, clock: Arc<dyn Clock>) -> Self {
        Self::with_recorder(mode, queue, AttemptRecorder::new(clock))
    }

    pub fn with_recorder(mode: StudyMode, queue: Vec<EntryId>, recorder: AttemptRecorder) -> Self {
        Self {
            mode,
            queue: queue.into(),
            recorder,
            stats: StageCounts::default(),
        }
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    /// Entry at the front of the queue.
    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Graded attempts so far, by snapshotted stage.
    pub fn stats(&self) -> StageCounts {
        self.stats
    }

    pub fn recorder(&self) -> &AttemptRecorder {
        &self.recorder
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty() && self.recorder.ongoing().is_none()
    }

    /// Question the current entry. `Ok(None)` when the queue is exhausted.
    pub fn start(&mut self, state: &DeckState) -> Result<Option<&Attempt>> {
        let entry_id = match self.queue.front() {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.recorder.start_attempt(state, &entry_id).map(Some)
    }

    pub fn answer(&mut self) -> bool {
        self.recorder.answer_attempt()
    }

    /// Grade the current entry and move past it.
    pub fn grade(&mut self, state: &DeckState, grade: u8) -> Result<Option<Graded>> {
        let graded = self.recorder.grade_attempt(state, grade)?;
        if let Some(graded) = &graded {
            if self.queue.front() == Some(&graded.attempt.entry_id) {
                self.queue.pop_front();
            }
            self.stats.increment(graded.attempt.stage);
        }
        Ok(graded)
    }

    /// Drop the current entry without grading it.
    pub fn skip(&mut self) -> Option<EntryId> {
        if self.recorder.ongoing().is_some() {
            return None;
        }
        self.queue.pop_front()
    }
}
