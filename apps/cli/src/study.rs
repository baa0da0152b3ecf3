//! Interactive study loop.
//!
//! Enter reveals the glosses, `1`-`4` grade (Easy, Normal, Hard, Again) and
//! `q` ends the session early. Every grade publishes a new deck snapshot
//! to the store; persistence is a subscriber. A subscriber that fails
//! leaves its error in the shared [`SaveFailure`] slot and the loop stops.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::Context;
use vocab_core::{CoreError, DeckState, Entry, StageCounts, Store, StudySession};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed(StageCounts),
    Quit(StageCounts),
}

/// Error left behind by a store subscriber.
pub type SaveFailure = Rc<RefCell<Option<anyhow::Error>>>;

enum Input {
    Line(String),
    Quit,
}

pub fn run<R, W>(
    store: &mut Store<DeckState>,
    session: &mut StudySession,
    failure: &SaveFailure,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Outcome>
where
    R: BufRead,
    W: Write,
{
    loop {
        let remaining = session.remaining();
        let (entry_id, stage) = match session.start(store.state())? {
            Some(attempt) => (attempt.entry_id.clone(), attempt.stage),
            None => break,
        };
        let entry = store
            .state()
            .entry(&entry_id)
            .cloned()
            .with_context(|| format!("entry {entry_id} missing from deck"))?;

        writeln!(out, "\n[{remaining} left, {stage:?}] {}", entry.word)?;
        print_definitions(out, &entry, false)?;
        write!(out, "Press Enter to reveal, q to quit: ")?;
        out.flush()?;

        if let Input::Quit = read_input(input)? {
            return Ok(Outcome::Quit(session.stats()));
        }
        session.answer();
        print_definitions(out, &entry, true)?;

        loop {
            write!(out, "Grade [1] Easy [2] Normal [3] Hard [4] Again: ")?;
            out.flush()?;

            let line = match read_input(input)? {
                Input::Quit => return Ok(Outcome::Quit(session.stats())),
                Input::Line(line) => line,
            };
            let grade = match line.trim().parse::<u8>().ok().and_then(|n| n.checked_sub(1)) {
                Some(grade) => grade,
                None => {
                    writeln!(out, "Enter a number from 1 to 4.")?;
                    continue;
                }
            };

            match session.grade(store.state(), grade) {
                Ok(Some(graded)) => {
                    store.set_state(graded.state);
                    if let Some(err) = failure.borrow_mut().take() {
                        return Err(err.context("session stopped after a failed save"));
                    }
                    break;
                }
                Ok(None) => break,
                Err(CoreError::InvalidGrade(_)) => {
                    writeln!(out, "Enter a number from 1 to 4.")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(Outcome::Completed(session.stats()))
}

fn read_input<R: BufRead>(input: &mut R) -> anyhow::Result<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    if line.trim().eq_ignore_ascii_case("q") {
        return Ok(Input::Quit);
    }
    Ok(Input::Line(line))
}

fn print_definitions<W: Write>(out: &mut W, entry: &Entry, reveal: bool) -> std::io::Result<()> {
    for definition in &entry.definitions {
        if reveal {
            writeln!(out, "  {}. {}", definition.part_of_speech, definition.gloss)?;
        } else {
            writeln!(out, "  {}.", definition.part_of_speech)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::Arc;
    use vocab_core::{
        Deck, DeckRepository, Definition, ManualClock, SchedulerConfig, Stage, StudyMode,
    };

    use crate::storage::JsonDeckRepository;

    fn setup(words: &[&str]) -> (Store<DeckState>, StudySession) {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let state =
            DeckState::load(Deck::new("d1", "Test", now), SchedulerConfig::default()).unwrap();
        let raw = words.iter().map(|w| vocab_core::RawEntry {
            word: w.to_string(),
            definitions: vec![Definition::new("n", format!("meaning of {w}"))],
        });
        let (state, _) = state.import(raw, now);
        let queue: Vec<String> = state.entries().map(|e| e.id.clone()).collect();
        let session =
            StudySession::new(StudyMode::Study, queue, Arc::new(ManualClock::new(now)));
        (Store::new(state), session)
    }

    #[test]
    fn grades_every_entry_and_publishes() {
        let (mut store, mut session) = setup(&["apple", "pear"]);
        let published = Rc::new(RefCell::new(0));
        let counter = published.clone();
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let mut input = Cursor::new("\n1\n\n4\n");
        let mut out = Vec::new();
        let failure = SaveFailure::default();
        let outcome = run(&mut store, &mut session, &failure, &mut input, &mut out).unwrap();

        assert_eq!(
            outcome,
            Outcome::Completed(StageCounts {
                new: 2,
                review: 0,
                practice: 0
            })
        );
        assert_eq!(*published.borrow(), 2);
        assert_eq!(store.state().deck().attempts.len(), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("meaning of apple"));
    }

    #[test]
    fn invalid_grade_is_retried() {
        let (mut store, mut session) = setup(&["apple"]);
        let mut input = Cursor::new("\n9\nabc\n2\n");
        let mut out = Vec::new();
        let failure = SaveFailure::default();
        run(&mut store, &mut session, &failure, &mut input, &mut out).unwrap();

        let attempts = &store.state().deck().attempts;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].grade.map(|g| g.value()), Some(1));
        assert_eq!(attempts[0].stage, Stage::New);
    }

    #[test]
    fn quit_keeps_earlier_grades() {
        let (mut store, mut session) = setup(&["apple", "pear"]);
        let mut input = Cursor::new("\n1\nq\n");
        let mut out = Vec::new();
        let failure = SaveFailure::default();
        let outcome = run(&mut store, &mut session, &failure, &mut input, &mut out).unwrap();

        assert!(matches!(outcome, Outcome::Quit(stats) if stats.new == 1));
        assert_eq!(store.state().deck().attempts.len(), 1);
    }

    #[test]
    fn failed_save_stops_the_session() {
        let (mut store, mut session) = setup(&["apple", "pear"]);
        let not_a_dir = tempfile::NamedTempFile::new().unwrap();
        let repo = JsonDeckRepository::new(not_a_dir.path());

        let failure = SaveFailure::default();
        let slot = failure.clone();
        store.subscribe(move |state: &DeckState| {
            if let Err(err) = repo.save(state.deck()) {
                *slot.borrow_mut() = Some(err.into());
            }
        });

        let mut input = Cursor::new("\n1\n\n1\n");
        let mut out = Vec::new();
        let result = run(&mut store, &mut session, &failure, &mut input, &mut out);

        assert!(result.is_err());
        assert!(failure.borrow().is_none());
        assert_eq!(store.state().deck().attempts.len(), 1);
        assert_eq!(session.remaining(), 1);
    }
}
