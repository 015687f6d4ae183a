//! Learner registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/learner/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let learner = state.db.create_learner(payload.name.as_deref()).await?;

    tracing::info!(learner_id = %learner.id, "registered new learner");

    Ok(Json(RegisterResponse {
        learner_id: learner.id,
        token: learner.token,
    }))
}

/// GET /api/learner/status
pub async fn status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<LearnerStatusResponse>> {
    let learner = state
        .db
        .get_learner_by_token(&auth.token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown learner".to_string()))?;

    Ok(Json(LearnerStatusResponse {
        learner_id: learner.id,
        last_seen_at: learner.last_seen_at,
    }))
}
