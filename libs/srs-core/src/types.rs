//! Core types for the review scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recall quality for a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Blackout,
    Incorrect,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Convert to 5-point numeric value (0-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Blackout => 0,
            Self::Incorrect => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 5-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blackout),
            1 => Some(Self::Incorrect),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Whether this grade counts as a successful recall.
    /// `Good` and above pass; anything below resets the repetition streak.
    pub fn is_passing(self) -> bool {
        self >= Self::Good
    }
}

/// Scheduling state for one (learner, vocabulary item) pair.
///
/// Long-lived: outlives any single study session and is mutated only by the
/// scheduling algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Interval-growth multiplier, never below the algorithm's floor (1.3).
    pub ease_factor: f64,
    /// Days until the item is next due; 0 means due now / never scheduled.
    pub interval_days: u32,
    /// Consecutive passing recalls since the last failure or creation.
    pub repetitions: u32,
    /// When the item is next due for review.
    pub due_date: DateTime<Utc>,
}

impl ReviewState {
    /// Whether the item is due as of the given instant.
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.due_date <= as_of
    }
}
