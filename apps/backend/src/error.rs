//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// API error types
///
/// Every failure a caller can hit maps to a stable, named kind so the HTTP
/// layer (and its clients) can switch on `error` without parsing messages.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Collection {0} not found")]
    CollectionNotFound(Uuid),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Card {0} not found")]
    CardNotFound(Uuid),

    #[error("Collection {0} has no items")]
    EmptyCollection(Uuid),

    #[error("Card {0} is already answered")]
    AlreadyAnswered(Uuid),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::CollectionNotFound(_) => (StatusCode::NOT_FOUND, "collection_not_found"),
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            ApiError::CardNotFound(_) => (StatusCode::NOT_FOUND, "card_not_found"),
            ApiError::EmptyCollection(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "empty_collection")
            }
            ApiError::AlreadyAnswered(_) => (StatusCode::CONFLICT, "already_answered"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
