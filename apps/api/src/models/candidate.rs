use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job seeker as seen by the pipeline. Owned by the profile subsystem; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub job_preferences: String,
    /// URL, `s3://bucket/key`, or bare blob key of the uploaded resume.
    pub resume_url: Option<String>,
}

impl CandidateProfile {
    /// The stored resume location, if one is set and non-blank.
    pub fn resume_location(&self) -> Option<&str> {
        self.resume_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(resume_url: Option<&str>) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            full_name: "Ada Lovelace".to_string(),
            skills: vec![],
            experience: String::new(),
            job_preferences: String::new(),
            resume_url: resume_url.map(String::from),
        }
    }

    #[test]
    fn test_resume_location_rejects_blank() {
        assert_eq!(candidate(None).resume_location(), None);
        assert_eq!(candidate(Some("   ")).resume_location(), None);
        assert_eq!(
            candidate(Some(" https://cdn.example.com/cv.pdf ")).resume_location(),
            Some("https://cdn.example.com/cv.pdf")
        );
    }
}
