//! SM-2 style scheduler for pass/fail grading.
//!
//! Two fixed bootstrap intervals, then exponential growth scaled by a
//! per-card ease that moves with recent performance.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{ReviewState, INITIAL_EASE, MIN_EASE};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Ease has no ceiling unless this is set.
    pub maximum_ease: Option<f64>,
    pub ease_penalty: f64,
    pub ease_bonus: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub lapse_interval: u32,
    /// Keeps due dates representable.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MIN_EASE,
            maximum_ease: None,
            ease_penalty: 0.2,
            ease_bonus: 0.1,
            first_interval: 1,
            second_interval: 6,
            lapse_interval: 1,
            maximum_interval: 36_500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            interval: 0,
            repetition: 0,
            ease: self.initial_ease,
            next_review: now,
        }
    }

    fn schedule(&self, state: &ReviewState, passed: bool, now: DateTime<Utc>) -> SchedulingResult {
        let (interval, repetition, ease) = if passed {
            self.schedule_pass(state)
        } else {
            self.schedule_fail(state)
        };

        let next_due = now + Duration::days(i64::from(interval));

        SchedulingResult {
            new_state: ReviewState {
                interval,
                repetition,
                ease,
                next_review: next_due,
            },
            next_due,
        }
    }
}

impl Sm2 {
    fn schedule_fail(&self, state: &ReviewState) -> (u32, u32, f64) {
        let ease = (state.ease - self.ease_penalty).max(self.minimum_ease);
        (self.lapse_interval, 0, ease)
    }

    fn schedule_pass(&self, state: &ReviewState) -> (u32, u32, f64) {
        let interval = match state.repetition {
            0 => self.first_interval,
            1 => self.second_interval,
            _ => (f64::from(state.interval) * state.ease).round() as u32,
        }
        .min(self.maximum_interval);
        let mut ease = (state.ease + self.ease_bonus).max(self.minimum_ease);
        if let Some(max) = self.maximum_ease {
            ease = ease.min(max.max(self.minimum_ease));
        }
        (interval, state.repetition.saturating_add(1), ease)
    }
}
