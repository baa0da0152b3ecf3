//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{Grade, Score};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Score used as the prior for an entry's first grade.
    fn initial_score(&self, entry_id: &str) -> Score;

    /// Calculate the next score after a graded recall.
    fn update(&self, grade: Grade, prior: &Score) -> Score;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
