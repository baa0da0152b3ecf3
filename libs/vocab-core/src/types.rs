//! Core types for the vocabulary deck.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Maximum number of new entries introduced in one study session.
pub const DAILY_MAX: usize = 20;

/// Entry identifier (UUID string).
pub type EntryId = String;

/// An entry's position in the repetition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    Review,
    Practice,
}

impl Default for Stage {
    fn default() -> Self {
        Self::New
    }
}

/// Which entries a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// New entries (capped) followed by due reviews.
    Study,
    /// Entries not yet due, for free drilling.
    Practice,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Study
    }
}

/// Recall grade, 0 (easiest) to 3 (forgotten).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const EASY: Grade = Grade(0);
    pub const NORMAL: Grade = Grade(1);
    pub const HARD: Grade = Grade(2);
    pub const AGAIN: Grade = Grade(3);

    /// Validate a raw grade.
    pub fn new(value: u8) -> Result<Self> {
        if value <= Self::AGAIN.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidGrade(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Map onto the SM-2 0-5 quality scale (grade 0 is quality 5).
    pub fn quality(self) -> f64 {
        f64::from(3 - self.0) * 5.0 / 3.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

/// One sense of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub part_of_speech: String,
    pub gloss: String,
}

impl Definition {
    pub fn new(part_of_speech: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            part_of_speech: part_of_speech.into(),
            gloss: gloss.into(),
        }
    }
}

/// A vocabulary word and its definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub word: String,
    pub definitions: Vec<Definition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SM-2 scheduling parameters for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: EntryId,
    pub repetitions: u32,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
}

/// One question/answer/grade event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: u64,
    pub entry_id: EntryId,
    /// Stage at question time; never re-derived.
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    pub questioned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<DateTime<Utc>>,
}

/// Persisted deck: the aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: BTreeMap<EntryId, Entry>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    #[serde(default)]
    pub scores: BTreeMap<EntryId, Score>,
}

impl Deck {
    /// Create an empty deck. The id is supplied by the caller.
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: now,
            entries: BTreeMap::new(),
            attempts: Vec::new(),
            scores: BTreeMap::new(),
        }
    }
}

/// Deck with stage counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    pub entry_count: usize,
    pub new_count: usize,
    pub review_count: usize,
    pub practice_count: usize,
}

/// Per-entry statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryStats {
    pub entry_id: EntryId,
    pub word: String,
    pub attempt_count: usize,
    pub latest_graded_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub stage: Stage,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub new_cards_per_day: usize,
    /// Hour of day (0-23) when a new study day begins.
    pub daily_reset_hour: u32,
    /// Offset of the learner's timezone from UTC.
    pub utc_offset_minutes: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            new_cards_per_day: DAILY_MAX,
            daily_reset_hour: 0,
            utc_offset_minutes: 0,
        }
    }
}

impl SchedulerConfig {
    /// Defaults, with the machine's current UTC offset.
    pub fn local() -> Self {
        let offset = chrono::Local::now().offset().local_minus_utc();
        Self {
            utc_offset_minutes: offset / 60,
            ..Self::default()
        }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Calendar day a timestamp belongs to, from a study perspective.
    ///
    /// Before the reset hour, "today" is still yesterday.
    pub fn study_day(&self, at: DateTime<Utc>) -> NaiveDate {
        let local = at.with_timezone(&self.offset());
        (local - Duration::hours(i64::from(self.daily_reset_hour))).date_naive()
    }
}
