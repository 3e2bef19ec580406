//! Axum route handlers for auto-apply and application listing.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::apply::orchestrator::ApplicationOutcome;
use crate::errors::AppError;
use crate::matching::handlers::CandidateQuery;
use crate::models::{ApplicationRecord, JobPosting};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutoApplyRequest {
    pub candidate_id: Uuid,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

/// POST /api/v1/auto-apply
///
/// One outcome per job, in request order. Individual failures are reported
/// inline; only validation problems fail the whole request.
pub async fn handle_auto_apply(
    State(state): State<AppState>,
    Json(request): Json<AutoApplyRequest>,
) -> Result<Json<Vec<ApplicationOutcome>>, AppError> {
    if request.jobs.is_empty() {
        return Err(AppError::validation("No jobs provided for auto-apply."));
    }

    let candidate = state.candidate(request.candidate_id).await?;
    let outcomes = state.auto_apply.auto_apply(&candidate, &request.jobs).await?;
    Ok(Json(outcomes))
}

/// GET /api/v1/applications?candidate_id=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<CandidateQuery>,
) -> Result<Json<Vec<ApplicationRecord>>, AppError> {
    let candidate = state.candidate(params.candidate_id).await?;
    let applications = state
        .applications
        .applications_for_candidate(candidate.id)
        .await?;
    Ok(Json(applications))
}
