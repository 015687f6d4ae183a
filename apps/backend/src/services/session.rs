//! Study session lifecycle.
//!
//! Owns the three operations the study routes expose: starting a session,
//! recording one answer, and reading a session back. Routes stay thin; all
//! multi-step work against the database happens here.

use chrono::Utc;
use uuid::Uuid;

use srs_core::{Grade, ReviewScheduler, Sm2};

use crate::db::{Database, NewSessionCard};
use crate::error::{ApiError, Result};
use crate::models::*;

/// Card cap applied when a start request does not name one.
pub const DEFAULT_SESSION_CARDS: i32 = 20;

/// Start a study session over a collection.
///
/// Selects up to `max_cards` items in storage order, loading or creating the
/// review state each card snapshots. The session and its cards are persisted
/// together; a collection with no items never produces a session.
pub async fn start_session(
    db: &Database,
    learner_id: Uuid,
    request: &StartSessionRequest,
) -> Result<SessionResponse> {
    let max_cards = request.max_cards.unwrap_or(DEFAULT_SESSION_CARDS);
    if max_cards < 1 {
        return Err(ApiError::BadRequest(format!(
            "max_cards must be at least 1, got {}",
            max_cards
        )));
    }

    let collection = db
        .get_collection(request.collection_id, learner_id)
        .await?
        .ok_or(ApiError::CollectionNotFound(request.collection_id))?;

    let items = db.get_collection_items(collection.id).await?;
    if items.is_empty() {
        return Err(ApiError::EmptyCollection(collection.id));
    }

    let scheduler = Sm2::default();
    let now = Utc::now();

    let mut cards = Vec::with_capacity(items.len().min(max_cards as usize));
    for (index, item) in items.into_iter().take(max_cards as usize).enumerate() {
        let state = match db.get_review_state(learner_id, item.id).await? {
            Some(row) => row.to_core_state(),
            None => {
                // First time this learner sees the item: persist the fresh
                // state so concurrent sessions serialize on the same row.
                let fresh = scheduler.initial_state(now);
                db.upsert_review_state(learner_id, item.id, &fresh).await?;
                fresh
            }
        };
        cards.push(NewSessionCard {
            item_id: item.id,
            position: (index + 1) as i32,
            state,
        });
    }

    let session = db.create_session(learner_id, collection.id, &cards).await?;

    tracing::info!(
        session_id = %session.id,
        collection_id = %collection.id,
        total_cards = session.total_cards,
        "started study session"
    );

    let cards = db.get_session_cards(session.id).await?;
    Ok(SessionResponse::new(session, cards))
}

/// Record one answer against a session card.
///
/// The card update is conditional on the card being unanswered; of two
/// concurrent answers exactly one applies the scheduler, the other gets
/// `AlreadyAnswered`.
pub async fn record_answer(
    db: &Database,
    learner_id: Uuid,
    session_id: Uuid,
    request: &RecordAnswerRequest,
) -> Result<RecordAnswerResponse> {
    let grade = u8::try_from(request.grade)
        .ok()
        .and_then(Grade::from_value)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "grade must be between 0 and 4, got {}",
                request.grade
            ))
        })?;

    let session = db
        .get_session(session_id, learner_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    let card = db
        .get_session_card(session.id, request.card_id)
        .await?
        .ok_or(ApiError::CardNotFound(request.card_id))?;

    if card.is_answered() {
        return Err(ApiError::AlreadyAnswered(card.id));
    }

    let scheduler = Sm2::default();
    let now = Utc::now();

    let current_state = db
        .get_review_state(learner_id, card.item_id)
        .await?
        .map(|row| row.to_core_state())
        .unwrap_or_else(|| scheduler.initial_state(now));

    let next_state = scheduler.schedule(&current_state, grade, now);
    let was_correct = grade.is_passing();

    // The guarded card update is the atomicity gate; only the winner goes on
    // to write the review state.
    let applied = db
        .record_card_answer(
            session.id,
            card.id,
            grade,
            was_correct,
            request.time_taken_ms,
            &next_state,
            now,
        )
        .await?;
    if !applied {
        return Err(ApiError::AlreadyAnswered(card.id));
    }

    db.upsert_review_state(learner_id, card.item_id, &next_state)
        .await?;

    let answered_count = db.count_answered_cards(session.id).await?;
    let is_completed = answered_count >= session.total_cards as i64;
    if is_completed {
        db.mark_session_complete(session.id, now).await?;
        tracing::info!(session_id = %session.id, "study session completed");
    }

    let card = db
        .get_session_card(session.id, request.card_id)
        .await?
        .ok_or(ApiError::CardNotFound(request.card_id))?;

    Ok(RecordAnswerResponse {
        card,
        progress: SessionProgress {
            answered_count,
            total_cards: session.total_cards,
            is_completed,
        },
    })
}

/// Fetch a session with its cards and derived progress.
pub async fn fetch_session(
    db: &Database,
    learner_id: Uuid,
    session_id: Uuid,
) -> Result<SessionResponse> {
    let session = db
        .get_session(session_id, learner_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    let cards = db.get_session_cards(session.id).await?;
    Ok(SessionResponse::new(session, cards))
}
