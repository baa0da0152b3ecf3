//! Persistence contract implemented by callers.
//!
//! The core never calls this itself; it is the shape a front end provides so
//! loading and saving stay outside the scheduling logic.

use crate::types::Deck;

pub trait DeckRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Identifiers of every stored deck.
    fn list_ids(&self) -> Result<Vec<String>, Self::Error>;

    /// `Ok(None)` when no deck with this id exists.
    fn load(&self, deck_id: &str) -> Result<Option<Deck>, Self::Error>;

    fn save(&self, deck: &Deck) -> Result<(), Self::Error>;
}
