//! Scheduling algorithm implementations.

pub mod sm2;

pub use sm2::Sm2;

use crate::types::{Grade, ReviewState};
use chrono::{DateTime, Utc};

/// Trait for spaced-repetition schedulers.
///
/// Implementations are pure: same state, grade, and clock always produce the
/// same result.
pub trait ReviewScheduler: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// State for an item that has never been reviewed.
    fn initial_state(&self, now: DateTime<Utc>) -> ReviewState;

    /// Compute the next state after an answer with the given grade.
    fn schedule(&self, state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState;
}
