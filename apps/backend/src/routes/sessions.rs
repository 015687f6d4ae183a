//! Study session endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::services::session;
use crate::AppState;

/// POST /api/study/sessions
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let response = session::start_session(&state.db, auth.learner_id, &payload).await?;
    Ok(Json(response))
}

/// GET /api/study/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let response = session::fetch_session(&state.db, auth.learner_id, session_id).await?;
    Ok(Json(response))
}

/// POST /api/study/sessions/{id}/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<RecordAnswerRequest>,
) -> Result<Json<RecordAnswerResponse>> {
    let response = session::record_answer(&state.db, auth.learner_id, session_id, &payload).await?;
    Ok(Json(response))
}
