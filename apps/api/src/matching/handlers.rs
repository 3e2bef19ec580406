//! Axum route handlers for job recommendations.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::JobPosting;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub candidate_id: Uuid,
}

/// GET /api/v1/recommendations?candidate_id=
///
/// Returns up to five catalog postings ranked for the candidate.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(params): Query<CandidateQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let candidate = state.candidate(params.candidate_id).await?;
    let jobs = state.recommender.recommend(&candidate).await?;
    Ok(Json(jobs))
}
