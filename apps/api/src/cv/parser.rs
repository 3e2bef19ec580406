//! CV extraction: turns resume text into typed candidate fields.
//!
//! Core feature: gateway and parse failures reach the caller.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::prompts::{CV_PARSER_PROMPT_TEMPLATE, CV_PARSER_SYSTEM};
use crate::documents::DocumentTextExtractor;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, STANDARD_MODEL};
use crate::models::CandidateProfile;

const CV_PARSER_MAX_TOKENS: u32 = 500;
// Low temperature: extraction, not writing.
const CV_PARSER_TEMPERATURE: f32 = 0.3;

const CV_PARSER_POLICY: OnParseFailure<ParsedCvData> = OnParseFailure::Throw;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCvData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub certifications: Vec<String>,
    pub summary: String,
}

/// Extracts structured fields from raw resume text.
pub async fn extract_cv_details(llm: &dyn ChatModel, cv_text: &str) -> Result<ParsedCvData, AppError> {
    if cv_text.trim().is_empty() {
        return Err(AppError::validation("CV text cannot be empty"));
    }

    let prompt = fill(
        CV_PARSER_PROMPT_TEMPLATE,
        &[("cv_text", cv_text.trim()), ("json_only", JSON_ONLY_INSTRUCTION)],
    );
    let request = GenerativeRequest::new(STANDARD_MODEL, CV_PARSER_MAX_TOKENS, CV_PARSER_TEMPERATURE)
        .system(CV_PARSER_SYSTEM)
        .user(prompt);

    let parsed = request_structured(llm, "cv extraction", &request, CV_PARSER_POLICY).await?;
    info!(
        "Extracted CV details: {} skills, {} certifications",
        parsed.skills.len(),
        parsed.certifications.len()
    );
    Ok(parsed)
}

/// Fetches the candidate's stored resume and runs extraction on its text.
pub async fn extract_stored_cv(
    llm: &dyn ChatModel,
    documents: &DocumentTextExtractor,
    candidate: &CandidateProfile,
) -> Result<ParsedCvData, AppError> {
    let location = candidate
        .resume_location()
        .ok_or_else(|| AppError::validation("Candidate has no uploaded resume."))?;

    let text = documents.extract_text(location).await?;
    if text.is_empty() {
        return Err(AppError::validation(
            "The uploaded resume contains no extractable text.",
        ));
    }

    extract_cv_details(llm, &text).await
}
