//! Spaced-repetition core for the vocabulary drill.
//!
//! Provides:
//! - SM-2 score engine
//! - Stage classification (New / Review / Practice)
//! - Session queue construction
//! - Attempt lifecycle recording over immutable deck snapshots
//! - A small publish/subscribe store and an injectable clock
//!
//! Nothing here performs I/O; persistence goes through [`DeckRepository`],
//! implemented by the caller.

pub mod algorithm;
pub mod clock;
pub mod deck;
pub mod error;
pub mod queue;
pub mod recorder;
pub mod repository;
pub mod schedule;
pub mod session;
pub mod store;
pub mod types;

pub use algorithm::{get_algorithm, sm2::Sm2, SpacedRepetitionAlgorithm};
pub use clock::{Clock, ManualClock, SystemClock};
pub use deck::{DeckState, ImportSummary, RawEntry, Upsert};
pub use error::{CoreError, Result};
pub use queue::build_queue;
pub use recorder::{AttemptRecorder, Graded, Phase};
pub use repository::DeckRepository;
pub use schedule::StageCounts;
pub use session::StudySession;
pub use store::{ListenerId, Store};
pub use types::{
    Attempt, Deck, DeckSummary, Definition, Entry, EntryId, EntryStats, Grade, SchedulerConfig,
    Score, Stage, StudyMode, DAILY_MAX,
};
