//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Create a learner register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create a collection create request body.
pub fn create_collection_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

/// Create an add-item request body.
pub fn add_item_request(word: &str, translation: &str) -> serde_json::Value {
    json!({ "word": word, "translation": translation })
}

/// Create a start-session request body.
pub fn start_session_request(collection_id: Uuid, max_cards: Option<i32>) -> serde_json::Value {
    match max_cards {
        Some(n) => json!({ "collection_id": collection_id, "max_cards": n }),
        None => json!({ "collection_id": collection_id }),
    }
}

/// Create a record-answer request body.
pub fn record_answer_request(card_id: Uuid, grade: i32) -> serde_json::Value {
    json!({
        "card_id": card_id,
        "grade": grade,
        "time_taken_ms": 2000
    })
}

/// Generate a unique collection name to avoid collisions between tests.
pub fn unique_collection_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}
