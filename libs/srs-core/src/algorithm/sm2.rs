//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable parameters and a five-level
//! recall grade (0-4).

use super::ReviewScheduler;
use crate::types::{Grade, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after the first passing repetition.
    pub first_interval_days: u32,
    /// Interval after the second passing repetition.
    pub second_interval_days: u32,
    /// Interval after any failing grade.
    pub relearn_interval_days: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval_days: 1,
            second_interval_days: 6,
            relearn_interval_days: 1,
        }
    }
}

impl ReviewScheduler for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            ease_factor: self.initial_ease,
            interval_days: 0,
            repetitions: 0,
            due_date: now,
        }
    }

    fn schedule(&self, state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState {
        let new_ease = self.adjust_ease(state.ease_factor, grade);

        let (new_repetitions, new_interval) = if grade.is_passing() {
            let repetitions = state.repetitions + 1;
            let interval = match repetitions {
                1 => self.first_interval_days,
                2 => self.second_interval_days,
                _ => (state.interval_days as f64 * new_ease).round() as u32,
            };
            (repetitions, interval)
        } else {
            // A failure always triggers a short-term re-test, regardless of
            // how long the item had been scheduled out.
            (0, self.relearn_interval_days)
        };

        ReviewState {
            ease_factor: new_ease,
            interval_days: new_interval,
            repetitions: new_repetitions,
            due_date: now + Duration::days(new_interval as i64),
        }
    }
}

impl Sm2 {
    /// Ease update: rewards high grades, penalizes low ones, floored at
    /// `minimum_ease` so an item can never become unschedulable.
    fn adjust_ease(&self, ease: f64, grade: Grade) -> f64 {
        let miss = (4 - grade.to_value()) as f64;
        (ease + (0.1 - miss * (0.08 + miss * 0.02))).max(self.minimum_ease)
    }
}
