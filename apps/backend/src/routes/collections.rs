//! Collection endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/collections
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<CreateCollectionRequest>,
) -> Result<Json<DbCollection>> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let collection = state
        .db
        .create_collection(auth.learner_id, payload.name.trim())
        .await?;

    Ok(Json(collection))
}

/// GET /api/collections
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<CollectionListResponse>> {
    let collections = state.db.list_collections(auth.learner_id).await?;

    Ok(Json(CollectionListResponse { collections }))
}

/// POST /api/collections/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(collection_id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<DbVocabItem>> {
    if payload.word.trim().is_empty() {
        return Err(ApiError::BadRequest("word must not be empty".to_string()));
    }

    // Ownership check before touching the collection's items
    let collection = state
        .db
        .get_collection(collection_id, auth.learner_id)
        .await?
        .ok_or(ApiError::CollectionNotFound(collection_id))?;

    let item = state
        .db
        .add_item(collection.id, payload.word.trim(), payload.translation.trim())
        .await?;

    Ok(Json(item))
}

/// GET /api/collections/{id}/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<CollectionStatsResponse>> {
    let collection = state
        .db
        .get_collection(collection_id, auth.learner_id)
        .await?
        .ok_or(ApiError::CollectionNotFound(collection_id))?;

    let stats = state
        .db
        .collection_stats(auth.learner_id, collection.id)
        .await?;

    Ok(Json(stats))
}
