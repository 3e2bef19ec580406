use std::sync::Arc;

use uuid::Uuid;

use crate::apply::orchestrator::AutoApplyOrchestrator;
use crate::cache::ResultCache;
use crate::documents::DocumentTextExtractor;
use crate::errors::AppError;
use crate::insights::interview::InterviewResponse;
use crate::llm_client::ChatModel;
use crate::matching::recommender::RecommendationEngine;
use crate::models::{CandidateProfile, JobPosting};
use crate::repository::{ApplicationRepository, CandidateStore, JobCatalog};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ChatModel>,
    pub candidates: Arc<dyn CandidateStore>,
    pub jobs: Arc<dyn JobCatalog>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub documents: DocumentTextExtractor,
    pub recommender: Arc<RecommendationEngine>,
    pub auto_apply: Arc<AutoApplyOrchestrator>,
    /// Interview question sets keyed by normalized (title, skills, count).
    pub interview_cache: Arc<ResultCache<InterviewResponse>>,
}

impl AppState {
    pub async fn candidate(&self, id: Uuid) -> Result<CandidateProfile, AppError> {
        self.candidates
            .find_candidate_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
    }

    pub async fn job(&self, id: Uuid) -> Result<JobPosting, AppError> {
        self.jobs
            .find_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }
}
