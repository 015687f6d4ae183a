//! Due review queue API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, SecondsFormat, Utc};
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

/// Test the due queue is empty for a fresh learner.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_empty_for_new_learner() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;

    let response = server
        .get("/api/study/due")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Cleanup
    ctx.cleanup_learner(learner_id).await;
}

/// Test items first seen in a session are due immediately.
#[tokio::test]
#[ignore = "requires database"]
async fn test_fresh_items_due_immediately() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let (collection_id, item_ids) = ctx
        .seed_collection(learner_id, &fixtures::unique_collection_name("due"), 2)
        .await;

    let response = server
        .post("/api/study/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::start_session_request(collection_id, None))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/study/due")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        let id = Uuid::parse_str(item["item_id"].as_str().unwrap()).unwrap();
        assert!(item_ids.contains(&id));
        assert_eq!(item["interval_days"], 0);
    }

    // Cleanup
    ctx.cleanup_learner(learner_id).await;
}

/// Test an answered item leaves the queue until its interval elapses.
#[tokio::test]
#[ignore = "requires database"]
async fn test_answered_item_scheduled_out() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let (collection_id, _) = ctx
        .seed_collection(learner_id, &fixtures::unique_collection_name("sched"), 1)
        .await;

    let response = server
        .post("/api/study/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::start_session_request(collection_id, None))
        .await;
    let session: serde_json::Value = response.json();
    let session_id = session["id"].as_str().unwrap();
    let card_id = Uuid::parse_str(session["cards"][0]["id"].as_str().unwrap()).unwrap();

    let response = server
        .post(&format!("/api/study/sessions/{}/answer", session_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::record_answer_request(card_id, 3))
        .await;
    response.assert_status_ok();

    // Not due now: the answer pushed it one day out
    let response = server
        .get("/api/study/due")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Due again when asked about a time past the interval
    let later = (Utc::now() + Duration::days(2)).to_rfc3339_opts(SecondsFormat::Millis, true);
    let response = server
        .get(&format!("/api/study/due?as_of={}", later))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["repetitions"], 1);

    // Cleanup
    ctx.cleanup_learner(learner_id).await;
}

/// Test the due query is a pure read: same as_of, same result.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_read_is_idempotent() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let (collection_id, _) = ctx
        .seed_collection(learner_id, &fixtures::unique_collection_name("idem"), 3)
        .await;

    let response = server
        .post("/api/study/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::start_session_request(collection_id, None))
        .await;
    response.assert_status_ok();

    let as_of = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let url = format!("/api/study/due?as_of={}", as_of);

    let first: serde_json::Value = server
        .get(&url)
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await
        .json();
    let second: serde_json::Value = server
        .get(&url)
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await
        .json();

    assert_eq!(first["items"], second["items"]);

    // Cleanup
    ctx.cleanup_learner(learner_id).await;
}

/// Test the due endpoint requires authentication.
#[tokio::test]
#[ignore = "requires database"]
async fn test_due_requires_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/study/due").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
