//! Session queue construction.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::deck::DeckState;
use crate::types::{EntryId, Stage, StudyMode};

/// Select and order the entries to present in one session.
///
/// Study mode takes up to `new_cards_per_day` randomly chosen new entries
/// followed by every due review. If that leaves nothing to do while new
/// entries exist, all of them are queued instead. Practice mode shuffles
/// every entry that is not yet due.
pub fn build_queue<R>(
    state: &DeckState,
    mode: StudyMode,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<EntryId>
where
    R: Rng + ?Sized,
{
    let queue = match mode {
        StudyMode::Practice => {
            let mut queue = state.entries_in_stage(Stage::Practice, now);
            queue.shuffle(rng);
            queue
        }
        StudyMode::Study => {
            let mut new_cards = state.entries_in_stage(Stage::New, now);
            let limit = state.config().new_cards_per_day.min(new_cards.len());
            let (selected, _) = new_cards.partial_shuffle(rng, limit);

            let mut queue = selected.to_vec();
            queue.extend(state.entries_in_stage(Stage::Review, now));

            if queue.is_empty() && !new_cards.is_empty() {
                new_cards
            } else {
                queue
            }
        }
    };

    tracing::debug!(deck = %state.deck().id, ?mode, len = queue.len(), "built session queue");
    queue
}
