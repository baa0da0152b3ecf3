//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2. Grades 0-3 are mapped onto the 0-5 quality scale
//! before the classic update is applied; a quality below 3 is a lapse.

use super::SpacedRepetitionAlgorithm;
use crate::types::{Grade, Score};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Upper bound on the interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            maximum_interval: 36500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_score(&self, entry_id: &str) -> Score {
        Score {
            id: entry_id.to_string(),
            repetitions: 0,
            ease_factor: self.initial_ease,
            interval: self.first_interval,
        }
    }

    fn update(&self, grade: Grade, prior: &Score) -> Score {
        let quality = grade.quality();

        let (repetitions, interval) = if quality >= 3.0 {
            let interval = match prior.repetitions {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => (f64::from(prior.interval) * prior.ease_factor)
                    .round()
                    .min(f64::from(self.maximum_interval)) as u32,
            };
            (
                prior.repetitions.saturating_add(1),
                interval.clamp(1, self.maximum_interval.max(1)),
            )
        } else {
            // Lapse
            (0, self.first_interval)
        };

        let miss = 5.0 - quality;
        let ease_factor =
            (prior.ease_factor + 0.1 - miss * (0.08 + miss * 0.02)).max(self.minimum_ease);

        Score {
            id: prior.id.clone(),
            repetitions,
            ease_factor,
            interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score(repetitions: u32, ease_factor: f64, interval: u32) -> Score {
        Score {
            id: "e1".to_string(),
            repetitions,
            ease_factor,
            interval,
        }
    }

    #[test]
    fn first_easy_grade() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::EASY, &sm2.initial_score("e1"));
        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval, 1);
        assert!((next.ease_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn second_pass_gets_six_days() {
        let sm2 = Sm2::default();
        let first = sm2.update(Grade::NORMAL, &sm2.initial_score("e1"));
        let second = sm2.update(Grade::NORMAL, &first);
        assert_eq!(first.interval, 1);
        assert_eq!(second.interval, 6);
        assert_eq!(second.repetitions, 2);
    }

    #[test]
    fn later_passes_multiply_by_ease() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::EASY, &score(2, 2.5, 6));
        assert_eq!(next.interval, 15);
        assert_eq!(next.repetitions, 3);
    }

    #[test]
    fn lapse_resets_progress() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::HARD, &score(7, 2.5, 120));
        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval, 1);
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::AGAIN, &score(3, 1.35, 10));
        assert_eq!(next.ease_factor, sm2.minimum_ease);
    }

    #[test]
    fn interval_is_capped() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::EASY, &score(9, 2.5, u32::MAX));
        assert_eq!(next.interval, sm2.maximum_interval);
        assert_eq!(next.repetitions, 10);
    }

    #[test]
    fn keeps_entry_id() {
        let sm2 = Sm2::default();
        let next = sm2.update(Grade::AGAIN, &score(0, 2.5, 1));
        assert_eq!(next.id, "e1");
    }
}
