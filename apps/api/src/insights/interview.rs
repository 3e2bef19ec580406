//! Interview question generation with read-through caching.
//!
//! Cache key: normalized job title, sorted and deduped lowercased skills, and
//! the question count. Successful results are reused for the cache's lifetime;
//! failures are never cached.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{CacheKey, ResultCache};
use crate::errors::AppError;
use crate::insights::prompts::{INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_SYSTEM};
use crate::llm_client::prompts::{fill, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, STANDARD_MODEL};

pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 15;

const INTERVIEW_MAX_TOKENS: u32 = 800;
const INTERVIEW_TEMPERATURE: f32 = 0.7;

const INTERVIEW_POLICY: OnParseFailure<InterviewResponse> = OnParseFailure::Throw;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewResponse {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewQuestion {
    pub question: String,
    pub answer: String,
}

/// Returns `count` interview questions with sample answers for the role.
///
/// The model may return more or fewer questions than asked; the list is passed
/// through as-is.
pub async fn generate_interview_questions(
    llm: &dyn ChatModel,
    cache: &ResultCache<InterviewResponse>,
    job_title: &str,
    skills: &[String],
    count: u32,
) -> Result<InterviewResponse, AppError> {
    let job_title = job_title.trim();
    if job_title.is_empty() {
        return Err(AppError::validation("Job title cannot be empty."));
    }
    let skills: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Err(AppError::validation("Skills cannot be empty."));
    }
    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
        return Err(AppError::validation(format!(
            "Question count must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}."
        )));
    }

    let key = CacheKey::new("interview")
        .part(job_title)
        .sorted_parts(&skills)
        .part(count)
        .build();

    cache
        .get_or_compute(&key, || async {
            let request = build_interview_request(job_title, &skills, count);
            let response =
                request_structured(llm, "interview questions", &request, INTERVIEW_POLICY).await?;
            info!(
                "Generated {} interview questions for '{}'",
                response.questions.len(),
                job_title
            );
            Ok::<_, AppError>(response)
        })
        .await
}

fn build_interview_request(job_title: &str, skills: &[&str], count: u32) -> GenerativeRequest {
    let prompt = fill(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("count", &count.to_string()),
            ("job_title", job_title),
            ("skills", &skills.join(", ")),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerativeRequest::new(STANDARD_MODEL, INTERVIEW_MAX_TOKENS, INTERVIEW_TEMPERATURE)
        .system(INTERVIEW_SYSTEM)
        .user(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const TWO_QUESTIONS: &str = r#"{"Questions": [
        {"Question": "What is ownership?", "Answer": "Each value has one owner."},
        {"question": "Describe a conflict.", "answer": "..."}
    ]}"#;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_parses_questions_and_answers() {
        let model = ScriptedModel::always(TWO_QUESTIONS);
        let cache = ResultCache::new();

        let response = generate_interview_questions(&model, &cache, "Rust Dev", &skills(&["Rust"]), 2)
            .await
            .unwrap();

        assert_eq!(response.questions.len(), 2);
        assert_eq!(response.questions[0].question, "What is ownership?");
        assert_eq!(response.questions[0].answer, "Each value has one owner.");
        assert!(model.prompt(0).contains("Generate 2 interview questions for a Rust Dev role."));
    }

    #[tokio::test]
    async fn test_equivalent_requests_hit_the_cache() {
        let model = ScriptedModel::always(TWO_QUESTIONS);
        let cache = ResultCache::new();

        let first = generate_interview_questions(&model, &cache, "Rust Dev", &skills(&["Rust", "SQL"]), 2)
            .await
            .unwrap();
        let second =
            generate_interview_questions(&model, &cache, " rust dev ", &skills(&["sql", "RUST"]), 2)
                .await
                .unwrap();

        assert_eq!(first, second);
        assert_eq!(model.calls(), 1);

        generate_interview_questions(&model, &cache, "Rust Dev", &skills(&["Rust", "SQL"]), 3)
            .await
            .unwrap();
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_count_out_of_range_is_rejected() {
        let model = ScriptedModel::always(TWO_QUESTIONS);
        let cache = ResultCache::new();

        for count in [0, 16] {
            let err = generate_interview_questions(&model, &cache, "Rust Dev", &skills(&["Rust"]), count)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "count {count}");
        }
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_title_or_skills_is_rejected() {
        let model = ScriptedModel::always(TWO_QUESTIONS);
        let cache = ResultCache::new();

        let err = generate_interview_questions(&model, &cache, "  ", &skills(&["Rust"]), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = generate_interview_questions(&model, &cache, "Rust Dev", &skills(&[" "]), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_output_throws_and_is_not_cached() {
        let model = ScriptedModel::new(vec![Ok("1. What is Rust?".to_string())]);
        let cache = ResultCache::new();

        let err = generate_interview_questions(&model, &cache, "Rust Dev", &skills(&["Rust"]), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
        assert!(cache.is_empty());
    }
}
