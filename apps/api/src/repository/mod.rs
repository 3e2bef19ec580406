//! Persistence collaborators. The pipeline depends only on these traits;
//! `postgres` holds the production adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRecord, CandidateProfile, JobPosting};

pub mod postgres;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn find_candidate_by_id(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError>;
}

#[async_trait]
pub trait JobCatalog: Send + Sync {
    async fn all_jobs(&self) -> Result<Vec<JobPosting>, AppError>;

    async fn find_job_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn save_application(&self, record: &ApplicationRecord) -> Result<(), AppError>;

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationRecord>, AppError>;
}
