//! Resume optimization: rewrites a resume for a target role and lists missing skills.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::prompts::{OPTIMIZER_PROMPT_TEMPLATE, OPTIMIZER_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, STANDARD_MODEL};

const OPTIMIZER_MAX_TOKENS: u32 = 800;
const OPTIMIZER_TEMPERATURE: f32 = 0.7;

const OPTIMIZER_POLICY: OnParseFailure<OptimizedCvResponse> = OnParseFailure::Throw;

fn default_industry() -> String {
    "General".to_string()
}

fn default_seniority() -> String {
    "Mid-Level".to_string()
}

fn default_style() -> String {
    "Professional".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeOptimizationRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default = "default_industry")]
    pub industry: String,
    /// Entry, Mid-Level or Senior.
    #[serde(default = "default_seniority")]
    pub seniority_level: String,
    /// Concise, Professional or Keyword-Optimized.
    #[serde(default = "default_style")]
    pub optimization_style: String,
}

impl ResumeOptimizationRequest {
    pub fn new(resume_text: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_title: job_title.into(),
            industry: default_industry(),
            seniority_level: default_seniority(),
            optimization_style: default_style(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizedCvResponse {
    #[serde(alias = "optimizedresume")]
    pub optimized_resume: String,
    #[serde(alias = "missingskills")]
    pub missing_skills: Vec<String>,
}

pub async fn optimize_resume(
    llm: &dyn ChatModel,
    request: &ResumeOptimizationRequest,
) -> Result<OptimizedCvResponse, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::validation("Resume text cannot be empty"));
    }

    let prompt = fill(
        OPTIMIZER_PROMPT_TEMPLATE,
        &[
            ("seniority_level", &request.seniority_level),
            ("industry", &request.industry),
            ("optimization_style", &request.optimization_style),
            ("job_title", &request.job_title),
            ("resume", request.resume_text.trim()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let generative = GenerativeRequest::new(STANDARD_MODEL, OPTIMIZER_MAX_TOKENS, OPTIMIZER_TEMPERATURE)
        .system(OPTIMIZER_SYSTEM)
        .user(prompt);

    let optimized =
        request_structured(llm, "resume optimization", &generative, OPTIMIZER_POLICY).await?;
    info!(
        "Optimized resume for '{}': {} missing skills",
        request.job_title,
        optimized.missing_skills.len()
    );
    Ok(optimized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    #[test]
    fn test_request_defaults_apply_when_omitted() {
        let request: ResumeOptimizationRequest =
            serde_json::from_str(r#"{"resume_text": "cv", "job_title": "SRE"}"#).unwrap();
        assert_eq!(request.industry, "General");
        assert_eq!(request.seniority_level, "Mid-Level");
        assert_eq!(request.optimization_style, "Professional");
    }

    #[tokio::test]
    async fn test_parses_camel_case_answer() {
        let model = ScriptedModel::always(
            r#"{"optimizedResume": "Better CV", "missingSkills": ["Kubernetes"]}"#,
        );
        let result = optimize_resume(&model, &ResumeOptimizationRequest::new("cv", "SRE"))
            .await
            .unwrap();
        assert_eq!(result.optimized_resume, "Better CV");
        assert_eq!(result.missing_skills, vec!["Kubernetes"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_request_options() {
        let model = ScriptedModel::always("{}");
        let mut request = ResumeOptimizationRequest::new("my resume", "Data Engineer");
        request.seniority_level = "Senior".to_string();
        request.industry = "Fintech".to_string();
        request.optimization_style = "Concise".to_string();

        optimize_resume(&model, &request).await.unwrap();

        let prompt = model.prompt(0);
        assert!(prompt.contains("for a Senior position in Fintech"));
        assert!(prompt.contains("prefers a Concise style"));
        assert!(prompt.contains("relevant to Data Engineer"));
        assert!(prompt.contains("my resume"));
        assert_eq!(model.requests()[0].max_tokens, 800);
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected() {
        let model = ScriptedModel::always("{}");
        let err = optimize_resume(&model, &ResumeOptimizationRequest::new("  ", "SRE"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_answer_throws() {
        let model = ScriptedModel::always("Here is your improved resume!");
        let err = optimize_resume(&model, &ResumeOptimizationRequest::new("cv", "SRE"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }
}
