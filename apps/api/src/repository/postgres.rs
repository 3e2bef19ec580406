use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRecord, ApplicationStatus, CandidateProfile, JobPosting};
use crate::repository::{ApplicationRepository, CandidateStore, JobCatalog};

/// Postgres-backed implementation of every persistence collaborator.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    candidate_id: Uuid,
    job_id: Uuid,
    resume_text: String,
    cover_letter: String,
    status: String,
    applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ApplicationRecord {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("application {}: {e}", row.id)))?;
        Ok(ApplicationRecord {
            id: row.id,
            candidate_id: row.candidate_id,
            job_id: row.job_id,
            resume_text: row.resume_text,
            cover_letter: row.cover_letter,
            status,
            applied_at: row.applied_at,
        })
    }
}

#[async_trait]
impl CandidateStore for PgRepository {
    async fn find_candidate_by_id(&self, id: Uuid) -> Result<Option<CandidateProfile>, AppError> {
        let candidate = sqlx::query_as::<_, CandidateProfile>(
            r#"
            SELECT id, full_name, skills, experience, job_preferences, resume_url
            FROM candidates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }
}

#[async_trait]
impl JobCatalog for PgRepository {
    async fn all_jobs(&self) -> Result<Vec<JobPosting>, AppError> {
        let jobs = sqlx::query_as::<_, JobPosting>(
            "SELECT id, title, company, description, skills_required FROM jobs ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn find_job_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let job = sqlx::query_as::<_, JobPosting>(
            "SELECT id, title, company, description, skills_required FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }
}

#[async_trait]
impl ApplicationRepository for PgRepository {
    async fn save_application(&self, record: &ApplicationRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, candidate_id, job_id, resume_text, cover_letter, status, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.candidate_id)
        .bind(record.job_id)
        .bind(&record.resume_text)
        .bind(&record.cover_letter)
        .bind(record.status.as_str())
        .bind(record.applied_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Saved application {} (candidate {}, job {})",
            record.id, record.candidate_id, record.job_id
        );
        Ok(())
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationRecord>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, candidate_id, job_id, resume_text, cover_letter, status, applied_at
            FROM job_applications
            WHERE candidate_id = $1
            ORDER BY applied_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ApplicationRecord::try_from).collect()
    }
}
