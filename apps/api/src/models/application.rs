use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a submitted application. The pipeline only ever creates `Pending`;
/// transitions belong to the recruiter workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

/// One application per (candidate, job) auto-apply attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub resume_text: String,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// A fresh `Pending` record with a generated id.
    pub fn pending(candidate_id: Uuid, job_id: Uuid, resume_text: String, cover_letter: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            job_id,
            resume_text,
            cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        }
    }
}
