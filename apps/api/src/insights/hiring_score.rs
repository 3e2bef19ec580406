//! Predictive hiring score for a candidate against one job.
//!
//! Soft feature: any gateway or parse failure yields a zero score with an
//! explanatory reason instead of an error.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::insights::prompts::HIRING_SCORE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill, skill_list, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, TURBO_MODEL};
use crate::models::{CandidateProfile, JobPosting};

const HIRING_SCORE_MAX_TOKENS: u32 = 500;
const HIRING_SCORE_TEMPERATURE: f32 = 0.5;
const MAX_SCORE: i32 = 100;

pub const HIRING_SCORE_FAILED_REASON: &str = "Error calculating hiring score";

const HIRING_SCORE_POLICY: OnParseFailure<HiringScore> = OnParseFailure::DefaultValue(fallback_score);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiringScore {
    pub score: i32,
    pub reason: String,
    pub improvements: Vec<String>,
}

fn fallback_score() -> HiringScore {
    HiringScore {
        score: 0,
        reason: HIRING_SCORE_FAILED_REASON.to_string(),
        improvements: Vec::new(),
    }
}

pub async fn calculate_hiring_score(
    llm: &dyn ChatModel,
    candidate: &CandidateProfile,
    job: &JobPosting,
) -> Result<HiringScore, AppError> {
    let prompt = fill(
        HIRING_SCORE_PROMPT_TEMPLATE,
        &[
            ("name", &candidate.full_name),
            ("job_title", &job.title),
            ("company", &job.company),
            ("skills", &skill_list(&candidate.skills)),
            ("experience", &candidate.experience),
            ("requirements", &skill_list(&job.skills_required)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let request = GenerativeRequest::new(TURBO_MODEL, HIRING_SCORE_MAX_TOKENS, HIRING_SCORE_TEMPERATURE)
        .user(prompt);

    let mut result = request_structured(llm, "hiring score", &request, HIRING_SCORE_POLICY).await?;
    result.score = result.score.clamp(0, MAX_SCORE);

    info!(
        "Hiring score for {} on '{}': {}",
        candidate.id, job.title, result.score
    );
    Ok(result)
}
