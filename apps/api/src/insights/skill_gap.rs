//! Skill-gap analysis with course recommendations. Soft feature: failures
//! yield empty lists.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::insights::prompts::SKILL_GAP_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill, skill_list, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, TURBO_MODEL};
use crate::models::{CandidateProfile, JobPosting};

const SKILL_GAP_MAX_TOKENS: u32 = 500;
const SKILL_GAP_TEMPERATURE: f32 = 0.5;

const SKILL_GAP_POLICY: OnParseFailure<SkillGapAnalysis> =
    OnParseFailure::DefaultValue(SkillGapAnalysis::default);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGapAnalysis {
    #[serde(alias = "missingskills")]
    pub missing_skills: Vec<String>,
    #[serde(alias = "recommendedcourses")]
    pub recommended_courses: Vec<OnlineCourse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineCourse {
    pub platform: String,
    #[serde(alias = "coursetitle")]
    pub course_title: String,
    pub link: String,
}

pub async fn analyze_skill_gap(
    llm: &dyn ChatModel,
    candidate: &CandidateProfile,
    job: &JobPosting,
) -> Result<SkillGapAnalysis, AppError> {
    let prompt = fill(
        SKILL_GAP_PROMPT_TEMPLATE,
        &[
            ("name", &candidate.full_name),
            ("job_title", &job.title),
            ("company", &job.company),
            ("skills", &skill_list(&candidate.skills)),
            ("requirements", &skill_list(&job.skills_required)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let request =
        GenerativeRequest::new(TURBO_MODEL, SKILL_GAP_MAX_TOKENS, SKILL_GAP_TEMPERATURE).user(prompt);

    let analysis = request_structured(llm, "skill gap", &request, SKILL_GAP_POLICY).await?;
    info!(
        "Skill gap for {} on '{}': {} missing, {} courses",
        candidate.id,
        job.title,
        analysis.missing_skills.len(),
        analysis.recommended_courses.len()
    );
    Ok(analysis)
}
