//! Attempt lifecycle: Idle -> Questioned -> Answered -> Graded -> Idle.
//!
//! Only one attempt is ongoing at a time. The stage is snapshotted when the
//! question is shown, and grading a `Practice` attempt records history
//! without touching the schedule.

use std::sync::Arc;

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::clock::Clock;
use crate::deck::DeckState;
use crate::error::{CoreError, Result};
use crate::types::{Attempt, Grade, Stage};

/// Where the recorder is in the attempt lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Questioned(Attempt),
    Answered(Attempt),
}

/// A completed attempt and the deck snapshot that includes it.
#[derive(Debug, Clone)]
pub struct Graded {
    pub attempt: Attempt,
    pub state: DeckState,
}

pub struct AttemptRecorder {
    phase: Phase,
    clock: Arc<dyn Clock>,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl AttemptRecorder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_algorithm(clock, Box::new(Sm2::default()))
    }

    pub fn with_algorithm(
        clock: Arc<dyn Clock>,
        algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            clock,
            algorithm,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The attempt in progress, if any.
    pub fn ongoing(&self) -> Option<&Attempt> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Questioned(attempt) | Phase::Answered(attempt) => Some(attempt),
        }
    }

    /// Show an entry's question.
    pub fn start_attempt(&mut self, state: &DeckState, entry_id: &str) -> Result<&Attempt> {
        if self.phase != Phase::Idle {
            return Err(CoreError::AttemptInProgress);
        }
        if state.entry(entry_id).is_none() {
            return Err(CoreError::UnknownEntry(entry_id.to_string()));
        }

        let now = self.clock.now();
        let attempt = Attempt {
            id: state.next_attempt_id(),
            entry_id: entry_id.to_string(),
            stage: state.classify(entry_id, now),
            grade: None,
            questioned_at: now,
            answered_at: None,
            graded_at: None,
        };
        self.phase = Phase::Questioned(attempt);
        self.ongoing().ok_or(CoreError::AttemptInProgress)
    }

    /// Reveal the answer. Returns false when there was nothing to reveal.
    pub fn answer_attempt(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Questioned(mut attempt) => {
                attempt.answered_at = Some(self.clock.now());
                self.phase = Phase::Answered(attempt);
                true
            }
            other => {
                tracing::debug!(phase = ?other, "ignoring answer outside Questioned");
                self.phase = other;
                false
            }
        }
    }

    /// Grade the ongoing attempt.
    ///
    /// An out-of-range grade is rejected and the attempt stays open.
    /// Grading with no attempt open is ignored and returns `Ok(None)`.
    pub fn grade_attempt(&mut self, state: &DeckState, grade: u8) -> Result<Option<Graded>> {
        let grade = Grade::new(grade)?;

        let mut attempt = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Questioned(attempt) | Phase::Answered(attempt) => attempt,
            Phase::Idle => {
                tracing::debug!("ignoring grade with no attempt in progress");
                return Ok(None);
            }
        };

        attempt.grade = Some(grade);
        attempt.graded_at = Some(self.clock.now());

        let score = if attempt.stage == Stage::Practice {
            None
        } else {
            let prior = state
                .score(&attempt.entry_id)
                .cloned()
                .unwrap_or_else(|| self.algorithm.initial_score(&attempt.entry_id));
            Some(self.algorithm.update(grade, &prior))
        };

        tracing::debug!(
            entry = %attempt.entry_id,
            stage = ?attempt.stage,
            grade = grade.value(),
            interval = score.as_ref().map(|s| s.interval),
            "graded attempt"
        );

        let state = state.with_graded_attempt(attempt.clone(), score);
        Ok(Some(Graded { attempt, state }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::deck::tests::{at, deck_with_words};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn setup() -> (Arc<ManualClock>, AttemptRecorder, DeckState, String) {
        let clock = Arc::new(ManualClock::new(at(2, 9)));
        let recorder = AttemptRecorder::new(clock.clone());
        let state = deck_with_words(&["apple"]);
        let id = state.entry_by_word("apple").unwrap().id.clone();
        (clock, recorder, state, id)
    }

    fn run(recorder: &mut AttemptRecorder, state: &DeckState, id: &str, grade: u8) -> DeckState {
        recorder.start_attempt(state, id).unwrap();
        assert!(recorder.answer_attempt());
        recorder.grade_attempt(state, grade).unwrap().unwrap().state
    }

    #[test]
    fn full_lifecycle_records_attempt() {
        let (clock, mut recorder, state, id) = setup();

        let attempt = recorder.start_attempt(&state, &id).unwrap();
        assert_eq!(attempt.stage, Stage::New);
        assert_eq!(attempt.id, 0);

        clock.advance(Duration::seconds(5));
        assert!(recorder.answer_attempt());
        clock.advance(Duration::seconds(2));

        let graded = recorder.grade_attempt(&state, 0).unwrap().unwrap();
        assert_eq!(recorder.phase(), &Phase::Idle);
        assert_eq!(graded.attempt.questioned_at, at(2, 9));
        assert_eq!(graded.attempt.answered_at, Some(at(2, 9) + Duration::seconds(5)));
        assert_eq!(graded.attempt.graded_at, Some(at(2, 9) + Duration::seconds(7)));

        let next = graded.state;
        assert_eq!(next.deck().attempts.len(), 1);
        assert_eq!(next.attempt_count(&id), 1);
        let score = next.score(&id).unwrap();
        assert_eq!(score.repetitions, 1);
        assert_eq!(score.interval, 1);
        assert!((score.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(next.classify(&id, clock.now()), Stage::Practice);
    }

    #[test]
    fn invalid_grade_keeps_attempt_open() {
        let (_clock, mut recorder, state, id) = setup();
        recorder.start_attempt(&state, &id).unwrap();
        recorder.answer_attempt();

        assert_eq!(recorder.grade_attempt(&state, 5).unwrap_err(), CoreError::InvalidGrade(5));
        assert!(matches!(recorder.phase(), Phase::Answered(_)));

        let graded = recorder.grade_attempt(&state, 1).unwrap();
        assert!(graded.is_some());
    }

    #[test]
    fn out_of_sequence_calls_are_ignored() {
        let (_clock, mut recorder, state, id) = setup();
        assert!(!recorder.answer_attempt());
        assert!(recorder.grade_attempt(&state, 1).unwrap().is_none());

        recorder.start_attempt(&state, &id).unwrap();
        assert!(recorder.answer_attempt());
        let answered_at = recorder.ongoing().unwrap().answered_at;
        assert!(!recorder.answer_attempt());
        assert_eq!(recorder.ongoing().unwrap().answered_at, answered_at);
    }

    #[test]
    fn only_one_attempt_at_a_time() {
        let (_clock, mut recorder, state, id) = setup();
        recorder.start_attempt(&state, &id).unwrap();
        assert_eq!(
            recorder.start_attempt(&state, &id).unwrap_err(),
            CoreError::AttemptInProgress
        );
    }

    #[test]
    fn unknown_entry_is_rejected() {
        let (_clock, mut recorder, state, _id) = setup();
        assert_eq!(
            recorder.start_attempt(&state, "nope").unwrap_err(),
            CoreError::UnknownEntry("nope".into())
        );
        assert_eq!(recorder.phase(), &Phase::Idle);
    }

    #[test]
    fn grading_without_reveal_is_tolerated() {
        let (_clock, mut recorder, state, id) = setup();
        recorder.start_attempt(&state, &id).unwrap();
        let graded = recorder.grade_attempt(&state, 2).unwrap().unwrap();
        assert_eq!(graded.attempt.answered_at, None);
        assert!(graded.state.score(&id).is_some());
    }

    #[test]
    fn practice_grade_leaves_schedule_alone() {
        let (clock, mut recorder, state, id) = setup();
        let state = run(&mut recorder, &state, &id, 1);
        let score_before = state.score(&id).cloned();
        let due_before = state.due_date(&id);

        clock.advance(Duration::hours(1));
        let attempt = recorder.start_attempt(&state, &id).unwrap();
        assert_eq!(attempt.stage, Stage::Practice);
        recorder.answer_attempt();
        let next = recorder.grade_attempt(&state, 3).unwrap().unwrap().state;

        assert_eq!(next.score(&id).cloned(), score_before);
        assert_eq!(next.due_date(&id), due_before);
        assert_eq!(next.deck().attempts.len(), 2);
        assert_eq!(next.attempt_count(&id), 2);
        assert_eq!(next.deck().attempts[1].id, 1);
    }

    #[test]
    fn review_grade_moves_due_date() {
        let (clock, mut recorder, state, id) = setup();
        let state = run(&mut recorder, &state, &id, 0);

        clock.advance(Duration::days(1));
        assert_eq!(state.classify(&id, clock.now()), Stage::Review);
        let next = run(&mut recorder, &state, &id, 0);

        assert_eq!(next.score(&id).unwrap().interval, 6);
        assert_eq!(next.due_date(&id), Some(clock.now().date_naive() + Duration::days(6)));
    }
}
