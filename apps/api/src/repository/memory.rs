//! In-memory collaborators for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRecord, CandidateProfile, JobPosting};
use crate::repository::{ApplicationRepository, CandidateStore, JobCatalog};

#[derive(Default)]
pub struct MemoryStore {
    pub candidates: Mutex<Vec<CandidateProfile>>,
    pub jobs: Mutex<Vec<JobPosting>>,
    pub applications: Mutex<Vec<ApplicationRecord>>,
    /// Saves for these job ids fail with a database-style error.
    pub failing_jobs: Mutex<Vec<Uuid>>,
    pub catalog_reads: AtomicUsize,
}

impl MemoryStore {
    pub fn with_jobs(jobs: Vec<JobPosting>) -> Self {
        let store = Self::default();
        *store.jobs.lock().unwrap() = jobs;
        store
    }

    pub fn add_candidate(&self, candidate: CandidateProfile) {
        self.candidates.lock().unwrap().push(candidate);
    }

    pub fn fail_saves_for(&self, job_id: Uuid) {
        self.failing_jobs.lock().unwrap().push(job_id);
    }

    pub fn saved(&self) -> Vec<ApplicationRecord> {
        self.applications.lock().unwrap().clone()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn find_candidate_by_id(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

#[async_trait]
impl JobCatalog for MemoryStore {
    async fn all_jobs(&self) -> Result<Vec<JobPosting>, AppError> {
        self.catalog_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn find_job_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn save_application(&self, record: &ApplicationRecord) -> Result<(), AppError> {
        if self.failing_jobs.lock().unwrap().contains(&record.job_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "insert into job_applications failed"
            )));
        }
        self.applications.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationRecord>, AppError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect())
    }
}
