//! PostgreSQL persistence gateway
//!
//! All durable state the scheduler touches goes through this wrapper. The
//! one contract callers rely on beyond plain reads/writes is
//! [`Database::record_card_answer`]: the guarded update that lets exactly
//! one answer win per session card.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

use srs_core::{Grade, ReviewState};

/// Card selected into a session being created, with its starting state.
#[derive(Debug, Clone)]
pub struct NewSessionCard {
    pub item_id: Uuid,
    pub position: i32,
    pub state: ReviewState,
}

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Learner Repository ===

    /// Create a new learner with generated token
    pub async fn create_learner(&self, name: Option<&str>) -> Result<Learner> {
        let token = Uuid::new_v4().to_string();
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            INSERT INTO learners (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Get learner by token
    pub async fn get_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM learners
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Update learner last_seen_at timestamp
    pub async fn update_last_seen(&self, learner_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE learners
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Collection Repository ===

    /// Create a collection owned by a learner
    pub async fn create_collection(&self, learner_id: Uuid, name: &str) -> Result<DbCollection> {
        let collection = sqlx::query_as::<_, DbCollection>(
            r#"
            INSERT INTO collections (learner_id, name)
            VALUES ($1, $2)
            RETURNING id, learner_id, name, created_at
            "#,
        )
        .bind(learner_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(collection)
    }

    /// Get a collection scoped to its owner
    pub async fn get_collection(
        &self,
        collection_id: Uuid,
        learner_id: Uuid,
    ) -> Result<Option<DbCollection>> {
        let collection = sqlx::query_as::<_, DbCollection>(
            r#"
            SELECT id, learner_id, name, created_at
            FROM collections
            WHERE id = $1 AND learner_id = $2
            "#,
        )
        .bind(collection_id)
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    /// List a learner's collections with item/new/due counts
    pub async fn list_collections(&self, learner_id: Uuid) -> Result<Vec<CollectionInfo>> {
        let collections = sqlx::query_as::<_, CollectionInfo>(
            r#"
            SELECT
                col.id,
                col.name,
                COUNT(i.id)::INT AS item_count,
                COUNT(CASE WHEN i.id IS NOT NULL AND rs.item_id IS NULL THEN 1 END)::INT AS new_count,
                COUNT(CASE WHEN rs.due_date <= NOW() THEN 1 END)::INT AS due_count,
                col.created_at
            FROM collections col
            LEFT JOIN vocab_items i ON i.collection_id = col.id
            LEFT JOIN review_states rs ON rs.item_id = i.id AND rs.learner_id = $1
            WHERE col.learner_id = $1
            GROUP BY col.id
            ORDER BY col.name
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    /// Add a vocabulary item to a collection
    pub async fn add_item(
        &self,
        collection_id: Uuid,
        word: &str,
        translation: &str,
    ) -> Result<DbVocabItem> {
        let item = sqlx::query_as::<_, DbVocabItem>(
            r#"
            INSERT INTO vocab_items (collection_id, word, translation)
            VALUES ($1, $2, $3)
            RETURNING id, collection_id, word, translation, created_at
            "#,
        )
        .bind(collection_id)
        .bind(word)
        .bind(translation)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Get a collection's items in storage order
    pub async fn get_collection_items(&self, collection_id: Uuid) -> Result<Vec<DbVocabItem>> {
        let items = sqlx::query_as::<_, DbVocabItem>(
            r#"
            SELECT id, collection_id, word, translation, created_at
            FROM vocab_items
            WHERE collection_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // === Review State Repository ===

    /// Get review state for one (learner, item) pair
    pub async fn get_review_state(
        &self,
        learner_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<DbReviewState>> {
        let state = sqlx::query_as::<_, DbReviewState>(
            r#"
            SELECT learner_id, item_id, ease_factor, interval_days, repetitions,
                   due_date, created_at, updated_at
            FROM review_states
            WHERE learner_id = $1 AND item_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(state)
    }

    /// Upsert review state
    pub async fn upsert_review_state(
        &self,
        learner_id: Uuid,
        item_id: Uuid,
        state: &ReviewState,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_states (learner_id, item_id, ease_factor, interval_days,
                                       repetitions, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (learner_id, item_id) DO UPDATE SET
                ease_factor = EXCLUDED.ease_factor,
                interval_days = EXCLUDED.interval_days,
                repetitions = EXCLUDED.repetitions,
                due_date = EXCLUDED.due_date,
                updated_at = NOW()
            "#,
        )
        .bind(learner_id)
        .bind(item_id)
        .bind(state.ease_factor)
        .bind(state.interval_days as i32)
        .bind(state.repetitions as i32)
        .bind(state.due_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a learner's due review states, oldest due first
    pub async fn due_review_states(
        &self,
        learner_id: Uuid,
        as_of: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DueItem>> {
        let items = sqlx::query_as::<_, DueItem>(
            r#"
            SELECT rs.item_id, i.word, i.translation, rs.ease_factor,
                   rs.interval_days, rs.repetitions, rs.due_date
            FROM review_states rs
            JOIN vocab_items i ON i.id = rs.item_id
            WHERE rs.learner_id = $1 AND rs.due_date <= $2
            ORDER BY rs.due_date
            LIMIT $3
            "#,
        )
        .bind(learner_id)
        .bind(as_of)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // === Session Repository ===

    /// Create a session and its cards in one transaction
    pub async fn create_session(
        &self,
        learner_id: Uuid,
        collection_id: Uuid,
        cards: &[NewSessionCard],
    ) -> Result<DbStudySession> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            INSERT INTO study_sessions (learner_id, collection_id, total_cards)
            VALUES ($1, $2, $3)
            RETURNING id, learner_id, collection_id, total_cards, started_at, completed_at
            "#,
        )
        .bind(learner_id)
        .bind(collection_id)
        .bind(cards.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        for card in cards {
            sqlx::query(
                r#"
                INSERT INTO session_cards (session_id, item_id, position,
                                           ease_before, interval_before, repetitions_before)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(session.id)
            .bind(card.item_id)
            .bind(card.position)
            .bind(card.state.ease_factor)
            .bind(card.state.interval_days as i32)
            .bind(card.state.repetitions as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(session)
    }

    /// Get a session scoped to its owner
    pub async fn get_session(
        &self,
        session_id: Uuid,
        learner_id: Uuid,
    ) -> Result<Option<DbStudySession>> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            SELECT id, learner_id, collection_id, total_cards, started_at, completed_at
            FROM study_sessions
            WHERE id = $1 AND learner_id = $2
            "#,
        )
        .bind(session_id)
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get a session's cards in session order
    pub async fn get_session_cards(&self, session_id: Uuid) -> Result<Vec<DbSessionCard>> {
        let cards = sqlx::query_as::<_, DbSessionCard>(
            r#"
            SELECT sc.id, sc.session_id, sc.item_id, sc.position, i.word, i.translation,
                   sc.ease_before, sc.interval_before, sc.repetitions_before,
                   sc.grade, sc.was_correct, sc.time_taken_ms,
                   sc.ease_after, sc.interval_after, sc.repetitions_after, sc.answered_at
            FROM session_cards sc
            JOIN vocab_items i ON i.id = sc.item_id
            WHERE sc.session_id = $1
            ORDER BY sc.position
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Get one session card scoped to its session
    pub async fn get_session_card(
        &self,
        session_id: Uuid,
        card_id: Uuid,
    ) -> Result<Option<DbSessionCard>> {
        let card = sqlx::query_as::<_, DbSessionCard>(
            r#"
            SELECT sc.id, sc.session_id, sc.item_id, sc.position, i.word, i.translation,
                   sc.ease_before, sc.interval_before, sc.repetitions_before,
                   sc.grade, sc.was_correct, sc.time_taken_ms,
                   sc.ease_after, sc.interval_after, sc.repetitions_after, sc.answered_at
            FROM session_cards sc
            JOIN vocab_items i ON i.id = sc.item_id
            WHERE sc.session_id = $1 AND sc.id = $2
            "#,
        )
        .bind(session_id)
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Record an answer on a card, guarded on the card being unanswered.
    ///
    /// Returns false when another answer already landed; the row is left
    /// untouched in that case.
    pub async fn record_card_answer(
        &self,
        session_id: Uuid,
        card_id: Uuid,
        grade: Grade,
        was_correct: bool,
        time_taken_ms: Option<i32>,
        state_after: &ReviewState,
        answered_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE session_cards
            SET grade = $3,
                was_correct = $4,
                time_taken_ms = $5,
                ease_after = $6,
                interval_after = $7,
                repetitions_after = $8,
                answered_at = $9
            WHERE session_id = $1 AND id = $2 AND answered_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(card_id)
        .bind(grade.to_value() as i32)
        .bind(was_correct)
        .bind(time_taken_ms)
        .bind(state_after.ease_factor)
        .bind(state_after.interval_days as i32)
        .bind(state_after.repetitions as i32)
        .bind(answered_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a session's answered cards
    pub async fn count_answered_cards(&self, session_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM session_cards
            WHERE session_id = $1 AND answered_at IS NOT NULL
            "#,
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Stamp a session complete if it is not already
    pub async fn mark_session_complete(
        &self,
        session_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE study_sessions
            SET completed_at = $2
            WHERE id = $1 AND completed_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Stats ===

    /// Get scheduling statistics for one collection
    pub async fn collection_stats(
        &self,
        learner_id: Uuid,
        collection_id: Uuid,
    ) -> Result<CollectionStatsResponse> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(i.id)::INT AS total_items,
                COUNT(CASE WHEN rs.item_id IS NULL THEN 1 END)::INT AS new_items,
                COUNT(CASE WHEN rs.due_date <= NOW() THEN 1 END)::INT AS due_items,
                COALESCE(AVG(rs.ease_factor), 2.5)::FLOAT8 AS average_ease,
                COALESCE(AVG(rs.interval_days), 0)::FLOAT8 AS average_interval
            FROM vocab_items i
            LEFT JOIN review_states rs ON rs.item_id = i.id AND rs.learner_id = $1
            WHERE i.collection_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(collection_id)
        .fetch_one(&self.pool)
        .await?;

        let reviews_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM session_cards sc
            JOIN study_sessions s ON sc.session_id = s.id
            WHERE s.learner_id = $1 AND s.collection_id = $2
              AND sc.answered_at >= CURRENT_DATE
            "#,
        )
        .bind(learner_id)
        .bind(collection_id)
        .fetch_one(&self.pool)
        .await?;

        // Retention rate over the last 30 days of answers
        let retention: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(CASE WHEN sc.was_correct THEN 1.0 ELSE 0.0 END)::FLOAT8
            FROM session_cards sc
            JOIN study_sessions s ON sc.session_id = s.id
            WHERE s.learner_id = $1 AND s.collection_id = $2
              AND sc.answered_at >= NOW() - INTERVAL '30 days'
            "#,
        )
        .bind(learner_id)
        .bind(collection_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CollectionStatsResponse {
            total_items: row.get::<i32, _>("total_items") as usize,
            new_items: row.get::<i32, _>("new_items") as usize,
            due_items: row.get::<i32, _>("due_items") as usize,
            average_ease: row.get("average_ease"),
            average_interval: row.get("average_interval"),
            retention_rate: retention.unwrap_or(0.0),
            reviews_today: reviews_today as usize,
        })
    }
}
