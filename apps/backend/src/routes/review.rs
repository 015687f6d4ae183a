//! Due review queue endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

const DEFAULT_DUE_LIMIT: i64 = 100;

/// GET /api/study/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueResponse>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let limit = query.limit.unwrap_or(DEFAULT_DUE_LIMIT).clamp(1, 1000);

    let items = state
        .db
        .due_review_states(auth.learner_id, as_of, limit)
        .await?;

    Ok(Json(DueResponse { items, as_of }))
}
