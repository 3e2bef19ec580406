//! Axum route handlers for interview preparation and candidate insights.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::hiring_score::{calculate_hiring_score, HiringScore};
use crate::insights::interview::{generate_interview_questions, InterviewResponse};
use crate::insights::skill_gap::{analyze_skill_gap, SkillGapAnalysis};
use crate::state::AppState;

fn default_question_count() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct InterviewPrepRequest {
    pub job_title: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct CandidateJobRequest {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
}

/// POST /api/v1/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    Json(request): Json<InterviewPrepRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let response = generate_interview_questions(
        state.llm.as_ref(),
        &state.interview_cache,
        &request.job_title,
        &request.skills,
        request.question_count,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/insights/hiring-score
///
/// Always answers 200 once both records exist; model trouble shows up as a zero score.
pub async fn handle_hiring_score(
    State(state): State<AppState>,
    Json(request): Json<CandidateJobRequest>,
) -> Result<Json<HiringScore>, AppError> {
    let candidate = state.candidate(request.candidate_id).await?;
    let job = state.job(request.job_id).await?;
    let score = calculate_hiring_score(state.llm.as_ref(), &candidate, &job).await?;
    Ok(Json(score))
}

/// POST /api/v1/insights/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(request): Json<CandidateJobRequest>,
) -> Result<Json<SkillGapAnalysis>, AppError> {
    let candidate = state.candidate(request.candidate_id).await?;
    let job = state.job(request.job_id).await?;
    let analysis = analyze_skill_gap(state.llm.as_ref(), &candidate, &job).await?;
    Ok(Json(analysis))
}
