//! Spaced repetition scheduling.

pub mod sm2;

use crate::types::{CharacterCard, ReviewState};
use chrono::{DateTime, Utc};

/// Result of scheduling a card after a graded answer.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub new_state: ReviewState,
    pub next_due: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next review state after a pass or a fail.
    fn schedule(&self, state: &ReviewState, passed: bool, now: DateTime<Utc>) -> SchedulingResult;

    /// Initial state for a new card.
    fn initial_state(&self, now: DateTime<Utc>) -> ReviewState;
}

/// Apply a graded answer to `card` in place and return the new due date.
///
/// Only the scheduling fields and the derived `is_due` flag are written.
pub fn schedule_card(
    algorithm: &dyn SpacedRepetitionAlgorithm,
    card: &mut CharacterCard,
    passed: bool,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let result = algorithm.schedule(&card.review, passed, now);
    card.review = result.new_state;
    card.is_due = card.review.is_due_at(now);
    result.next_due
}
