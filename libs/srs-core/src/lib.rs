//! Core spaced-repetition library shared by the backend service.
//!
//! Provides:
//! - Scheduling algorithm (SM-2 family) behind the `ReviewScheduler` trait
//! - Shared types (`ReviewState`, `Grade`)
//!
//! Everything here is pure and synchronous; persistence and orchestration
//! live in the backend crate.

pub mod algorithm;
pub mod types;

pub use algorithm::{ReviewScheduler, Sm2};
pub use types::{Grade, ReviewState};
