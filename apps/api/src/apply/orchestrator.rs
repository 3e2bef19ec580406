//! Auto-apply orchestration: one batch, many jobs, isolated per job.
//!
//! Per job: Fetching → CoverLetter → Resume → Persisting → Applied.
//!
//! The candidate's resume is fetched lazily and at most once successfully per
//! batch; a failed fetch fails only the job that attempted it, and the next job
//! tries again. A failure at any stage yields a `Failed` outcome for that job
//! and processing continues. Output order always matches input order, including
//! when jobs run concurrently.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::apply::prompts::{COVER_LETTER_PROMPT_TEMPLATE, TAILORED_RESUME_PROMPT_TEMPLATE};
use crate::documents::DocumentTextExtractor;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, skill_list};
use crate::llm_client::{
    generate_text, ChatModel, GenerativeRequest, GENERATION_FAILED, PROCESSING_FAILED, TURBO_MODEL,
};
use crate::models::{ApplicationRecord, CandidateProfile, JobPosting};
use crate::repository::ApplicationRepository;

const APPLY_MAX_TOKENS: u32 = 600;
const APPLY_TEMPERATURE: f32 = 0.7;
/// Hard ceiling for per-batch concurrency regardless of configuration.
pub const MAX_APPLY_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStage {
    Fetching,
    CoverLetter,
    Resume,
    Persisting,
    Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    Applied,
    Failed,
}

/// Per-job result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationOutcome {
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub cover_letter: String,
    pub resume: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<ApplyStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplicationOutcome {
    fn applied(job: &JobPosting, record: ApplicationRecord) -> Self {
        Self {
            job_id: job.id,
            job_title: job.title.clone(),
            company: job.company.clone(),
            cover_letter: record.cover_letter,
            resume: record.resume_text,
            status: OutcomeStatus::Applied,
            application_id: Some(record.id),
            failed_stage: None,
            error: None,
        }
    }

    fn failed(job: &JobPosting, stage: ApplyStage, error: &AppError) -> Self {
        Self {
            job_id: job.id,
            job_title: job.title.clone(),
            company: job.company.clone(),
            cover_letter: String::new(),
            resume: String::new(),
            status: OutcomeStatus::Failed,
            application_id: None,
            failed_stage: Some(stage),
            error: Some(error.public_message()),
        }
    }
}

pub struct AutoApplyOrchestrator {
    llm: Arc<dyn ChatModel>,
    documents: DocumentTextExtractor,
    applications: Arc<dyn ApplicationRepository>,
    concurrency: usize,
}

impl AutoApplyOrchestrator {
    /// `concurrency` is clamped to `1..=MAX_APPLY_CONCURRENCY`; 1 processes jobs sequentially.
    pub fn new(
        llm: Arc<dyn ChatModel>,
        documents: DocumentTextExtractor,
        applications: Arc<dyn ApplicationRepository>,
        concurrency: usize,
    ) -> Self {
        Self {
            llm,
            documents,
            applications,
            concurrency: concurrency.clamp(1, MAX_APPLY_CONCURRENCY),
        }
    }

    /// Applies `candidate` to every job in `jobs`, returning one outcome per job in input order.
    ///
    /// Rejected up front, before any fetch or model call, when the candidate has
    /// no resume location or `jobs` is empty.
    pub async fn auto_apply(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
    ) -> Result<Vec<ApplicationOutcome>, AppError> {
        let location = candidate.resume_location().ok_or_else(|| {
            AppError::validation("Please upload a resume before applying for jobs.")
        })?;

        if jobs.is_empty() {
            return Err(AppError::validation("No jobs provided for auto-apply."));
        }

        info!(
            "Auto-applying candidate {} to {} jobs (concurrency {})",
            candidate.id,
            jobs.len(),
            self.concurrency
        );

        let resume_cell = OnceCell::new();
        let resume_text = &resume_cell;
        // Boxed up front so the batch future stays `Send` behind axum handlers.
        let pending: Vec<BoxFuture<'_, ApplicationOutcome>> = jobs
            .iter()
            .map(|job| self.apply_one(candidate, job, location, resume_text).boxed())
            .collect();
        let outcomes: Vec<ApplicationOutcome> = stream::iter(pending)
            .buffered(self.concurrency)
        .collect()
        .await;

        let applied = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Applied)
            .count();
        info!(
            "Auto-apply batch for {} finished: {} applied, {} failed",
            candidate.id,
            applied,
            outcomes.len() - applied
        );

        Ok(outcomes)
    }

    async fn apply_one(
        &self,
        candidate: &CandidateProfile,
        job: &JobPosting,
        location: &str,
        resume_text: &OnceCell<String>,
    ) -> ApplicationOutcome {
        match self.run_stages(candidate, job, location, resume_text).await {
            Ok(record) => {
                info!(
                    "Auto-applied to {} at {} for {}",
                    job.title, job.company, candidate.id
                );
                ApplicationOutcome::applied(job, record)
            }
            Err((stage, e)) => {
                warn!(
                    "Auto-apply to {} at {} failed at {:?}: {}",
                    job.title, job.company, stage, e
                );
                ApplicationOutcome::failed(job, stage, &e)
            }
        }
    }

    async fn run_stages(
        &self,
        candidate: &CandidateProfile,
        job: &JobPosting,
        location: &str,
        resume_text: &OnceCell<String>,
    ) -> Result<ApplicationRecord, (ApplyStage, AppError)> {
        debug!("job {}: {:?}", job.id, ApplyStage::Fetching);
        let original = resume_text
            .get_or_try_init(|| self.documents.extract_text(location))
            .await
            .map_err(|e| (ApplyStage::Fetching, AppError::from(e)))?;

        debug!("job {}: {:?}", job.id, ApplyStage::CoverLetter);
        let cover_letter =
            generate_text(self.llm.as_ref(), &cover_letter_request(candidate, job, original)).await;
        flag_sentinel(job, ApplyStage::CoverLetter, &cover_letter);

        debug!("job {}: {:?}", job.id, ApplyStage::Resume);
        let tailored =
            generate_text(self.llm.as_ref(), &tailored_resume_request(candidate, job, original)).await;
        flag_sentinel(job, ApplyStage::Resume, &tailored);

        debug!("job {}: {:?}", job.id, ApplyStage::Persisting);
        let record = ApplicationRecord::pending(candidate.id, job.id, tailored, cover_letter);
        self.applications
            .save_application(&record)
            .await
            .map_err(|e| (ApplyStage::Persisting, e))?;

        debug!("job {}: {:?}", job.id, ApplyStage::Applied);
        Ok(record)
    }
}

fn flag_sentinel(job: &JobPosting, stage: ApplyStage, text: &str) {
    if text == GENERATION_FAILED || text == PROCESSING_FAILED {
        warn!("job {}: {:?} produced placeholder text", job.id, stage);
    }
}

fn cover_letter_request(candidate: &CandidateProfile, job: &JobPosting, resume: &str) -> GenerativeRequest {
    let prompt = fill(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("name", &candidate.full_name),
            ("job_title", &job.title),
            ("company", &job.company),
            ("resume", resume),
            ("description", &job.description),
        ],
    );
    GenerativeRequest::new(TURBO_MODEL, APPLY_MAX_TOKENS, APPLY_TEMPERATURE).user(prompt)
}

fn tailored_resume_request(candidate: &CandidateProfile, job: &JobPosting, resume: &str) -> GenerativeRequest {
    let prompt = fill(
        TAILORED_RESUME_PROMPT_TEMPLATE,
        &[
            ("name", &candidate.full_name),
            ("job_title", &job.title),
            ("company", &job.company),
            ("skills_required", &skill_list(&job.skills_required)),
            ("resume", resume),
        ],
    );
    GenerativeRequest::new(TURBO_MODEL, APPLY_MAX_TOKENS, APPLY_TEMPERATURE).user(prompt)
}
