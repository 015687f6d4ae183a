//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use wordtrail_backend::db::Database;
use wordtrail_backend::AppState;

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let app = wordtrail_backend::router(AppState { db: db.clone() });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test learner and return its ID and token.
    pub async fn create_test_learner(&self, name: Option<&str>) -> (Uuid, String) {
        let learner = self
            .db
            .create_learner(name)
            .await
            .expect("Failed to create test learner");
        (learner.id, learner.token)
    }

    /// Create a collection with `item_count` vocabulary items.
    ///
    /// Returns the collection ID and the item IDs in storage order.
    pub async fn seed_collection(
        &self,
        learner_id: Uuid,
        name: &str,
        item_count: usize,
    ) -> (Uuid, Vec<Uuid>) {
        let collection = self
            .db
            .create_collection(learner_id, name)
            .await
            .expect("Failed to create test collection");

        let mut item_ids = Vec::with_capacity(item_count);
        for i in 0..item_count {
            let item = self
                .db
                .add_item(
                    collection.id,
                    &format!("word-{}", i + 1),
                    &format!("translation-{}", i + 1),
                )
                .await
                .expect("Failed to create test item");
            item_ids.push(item.id);
        }

        (collection.id, item_ids)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a learner.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_learner(&self, learner_id: Uuid) {
        // Delete in order due to foreign keys
        let _ = sqlx::query(
            "DELETE FROM session_cards WHERE session_id IN \
             (SELECT id FROM study_sessions WHERE learner_id = $1)",
        )
        .bind(learner_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM study_sessions WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM review_states WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query(
            "DELETE FROM vocab_items WHERE collection_id IN \
             (SELECT id FROM collections WHERE learner_id = $1)",
        )
        .bind(learner_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM collections WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;
    }
}
