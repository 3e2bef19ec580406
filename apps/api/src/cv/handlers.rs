//! Axum route handlers for the CV services.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::cv::optimizer::{optimize_resume, OptimizedCvResponse, ResumeOptimizationRequest};
use crate::cv::parser::{extract_cv_details, extract_stored_cv, ParsedCvData};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseCvRequest {
    pub cv_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractStoredCvRequest {
    pub candidate_id: Uuid,
}

/// POST /api/v1/cv/parse
///
/// Extracts structured fields from pasted resume text.
pub async fn handle_parse_cv(
    State(state): State<AppState>,
    Json(request): Json<ParseCvRequest>,
) -> Result<Json<ParsedCvData>, AppError> {
    let parsed = extract_cv_details(state.llm.as_ref(), &request.cv_text).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/cv/extract
///
/// Same as parse, but reads the candidate's stored resume document.
pub async fn handle_extract_stored_cv(
    State(state): State<AppState>,
    Json(request): Json<ExtractStoredCvRequest>,
) -> Result<Json<ParsedCvData>, AppError> {
    let candidate = state.candidate(request.candidate_id).await?;
    let parsed = extract_stored_cv(state.llm.as_ref(), &state.documents, &candidate).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/cv/optimize
pub async fn handle_optimize_cv(
    State(state): State<AppState>,
    Json(request): Json<ResumeOptimizationRequest>,
) -> Result<Json<OptimizedCvResponse>, AppError> {
    let optimized = optimize_resume(state.llm.as_ref(), &request).await?;
    Ok(Json(optimized))
}
