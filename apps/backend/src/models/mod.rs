//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from srs-core
pub use srs_core::{Grade, ReviewState};

// === Database Entity Types ===

/// Learner identity resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Learner {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Vocabulary collection owned by a learner
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCollection {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Vocabulary item stored in PostgreSQL
///
/// The text fields are opaque payload here; nothing in the scheduler reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVocabItem {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub word: String,
    pub translation: String,
    pub created_at: DateTime<Utc>,
}

/// Scheduling state in PostgreSQL, one row per (learner, item)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewState {
    pub learner_id: Uuid,
    pub item_id: Uuid,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbReviewState {
    /// Convert to the srs-core state
    pub fn to_core_state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.ease_factor,
            interval_days: self.interval_days.max(0) as u32,
            repetitions: self.repetitions.max(0) as u32,
            due_date: self.due_date,
        }
    }
}

/// Study session in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudySession {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub collection_id: Uuid,
    pub total_cards: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Session card joined with its vocabulary item
///
/// The `*_before` columns snapshot the scheduling state at session start;
/// the `*_after` columns are filled in by the one answer the card receives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSessionCard {
    pub id: Uuid,
    pub session_id: Uuid,
    pub item_id: Uuid,
    pub position: i32,
    pub word: String,
    pub translation: String,
    pub ease_before: f64,
    pub interval_before: i32,
    pub repetitions_before: i32,
    pub grade: Option<i32>,
    pub was_correct: Option<bool>,
    pub time_taken_ms: Option<i32>,
    pub ease_after: Option<f64>,
    pub interval_after: Option<i32>,
    pub repetitions_after: Option<i32>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl DbSessionCard {
    pub fn is_answered(&self) -> bool {
        self.answered_at.is_some()
    }
}

/// Collection with per-learner scheduling counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionInfo {
    pub id: Uuid,
    pub name: String,
    pub item_count: i32,
    pub new_count: i32,
    pub due_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Due review state joined with its vocabulary item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DueItem {
    pub item_id: Uuid,
    pub word: String,
    pub translation: String,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub due_date: DateTime<Utc>,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub learner_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearnerStatusResponse {
    pub learner_id: Uuid,
    pub last_seen_at: DateTime<Utc>,
}

// Collection types

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub word: String,
    pub translation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionListResponse {
    pub collections: Vec<CollectionInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionStatsResponse {
    pub total_items: usize,
    pub new_items: usize,
    pub due_items: usize,
    pub average_ease: f64,
    pub average_interval: f64,
    pub retention_rate: f64,
    pub reviews_today: usize,
}

// Study types

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub collection_id: Uuid,
    pub max_cards: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionProgress {
    pub answered_count: i64,
    pub total_cards: i32,
    pub is_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub total_cards: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cards: Vec<DbSessionCard>,
    pub progress: SessionProgress,
}

impl SessionResponse {
    /// Assemble a session view; progress is derived from the cards, never
    /// stored.
    pub fn new(session: DbStudySession, cards: Vec<DbSessionCard>) -> Self {
        let answered_count = cards.iter().filter(|c| c.is_answered()).count() as i64;
        Self {
            id: session.id,
            collection_id: session.collection_id,
            total_cards: session.total_cards,
            started_at: session.started_at,
            completed_at: session.completed_at,
            progress: SessionProgress {
                answered_count,
                total_cards: session.total_cards,
                is_completed: session.completed_at.is_some(),
            },
            cards,
        }
    }

    /// First unanswered card, in session order.
    pub fn next_card(&self) -> Option<&DbSessionCard> {
        self.cards.iter().find(|c| !c.is_answered())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordAnswerRequest {
    pub card_id: Uuid,
    pub grade: i32,
    pub time_taken_ms: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordAnswerResponse {
    pub card: DbSessionCard,
    pub progress: SessionProgress,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueQuery {
    pub as_of: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueResponse {
    pub items: Vec<DueItem>,
    pub as_of: DateTime<Utc>,
}
