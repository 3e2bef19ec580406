//! Recommendation engine: ranks the job catalog for a candidate.
//!
//! Flow: cache lookup (by candidate id) → load catalog → build ranking prompt →
//!       model call → resolve returned entries onto the catalog → cap at 5 → cache.
//!
//! The model never supplies job metadata: every returned entry is resolved
//! against the in-memory catalog, first by echoed id, then by exact title.
//! Titles are not unique, so a title-only answer picks the first unused posting
//! with that title in catalog order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{CacheKey, ResultCache};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, skill_list, JSON_ONLY_INSTRUCTION};
use crate::llm_client::structured::{request_structured, OnParseFailure};
use crate::llm_client::{ChatModel, GenerativeRequest, TURBO_MODEL};
use crate::matching::prompts::{RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM};
use crate::models::{CandidateProfile, JobPosting};
use crate::repository::JobCatalog;

/// Upper bound on returned recommendations.
pub const MAX_RECOMMENDATIONS: usize = 5;

const RECOMMENDATION_MAX_TOKENS: u32 = 300;
const RECOMMENDATION_TEMPERATURE: f32 = 0.7;

/// Recommendation is a core feature: failures reach the caller.
const RECOMMENDATION_POLICY: OnParseFailure<RecommendationList> = OnParseFailure::Throw;

/// Model answer shape. `jobs` may hold bare titles or objects with id/title.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationList {
    pub jobs: Vec<RecommendedJob>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecommendedJob {
    Title(String),
    Entry {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
}

pub struct RecommendationEngine {
    llm: Arc<dyn ChatModel>,
    catalog: Arc<dyn JobCatalog>,
    cache: Arc<ResultCache<Vec<JobPosting>>>,
}

impl RecommendationEngine {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        catalog: Arc<dyn JobCatalog>,
        cache: Arc<ResultCache<Vec<JobPosting>>>,
    ) -> Self {
        Self {
            llm,
            catalog,
            cache,
        }
    }

    /// Returns at most `MAX_RECOMMENDATIONS` postings from the catalog, ranked by the model.
    ///
    /// Cached per candidate id for the cache's lifetime; a changed catalog does
    /// not invalidate an existing entry.
    pub async fn recommend(&self, candidate: &CandidateProfile) -> Result<Vec<JobPosting>, AppError> {
        if candidate.id.is_nil() {
            return Err(AppError::validation("candidate id cannot be empty"));
        }

        let key = CacheKey::new("recommendations").part(candidate.id).build();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let catalog = self
            .catalog
            .all_jobs()
            .await
            .map_err(|e| AppError::Fetch(format!("job catalog unavailable: {e}")))?;

        if catalog.is_empty() {
            info!("Job catalog is empty; no recommendations for {}", candidate.id);
            return Ok(Vec::new());
        }

        let request = build_recommendation_request(candidate, &catalog);
        let answer: RecommendationList = request_structured(
            self.llm.as_ref(),
            "recommendation",
            &request,
            RECOMMENDATION_POLICY,
        )
        .await?;

        let recommended = resolve_against_catalog(&answer.jobs, &catalog);
        info!(
            "Recommended {} of {} catalog jobs for candidate {}",
            recommended.len(),
            catalog.len(),
            candidate.id
        );

        self.cache.insert(key, recommended.clone());
        Ok(recommended)
    }
}

fn build_recommendation_request(candidate: &CandidateProfile, catalog: &[JobPosting]) -> GenerativeRequest {
    let catalog_lines = catalog
        .iter()
        .map(|j| {
            format!(
                "- [{}] {} at {} (Required Skills: {})",
                j.id,
                j.title,
                j.company,
                skill_list(&j.skills_required)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = fill(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("name", &candidate.full_name),
            ("skills", &skill_list(&candidate.skills)),
            ("experience", &candidate.experience),
            ("preferences", &candidate.job_preferences),
            ("catalog", &catalog_lines),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    GenerativeRequest::new(TURBO_MODEL, RECOMMENDATION_MAX_TOKENS, RECOMMENDATION_TEMPERATURE)
        .system(RECOMMENDATION_SYSTEM)
        .user(prompt)
}

/// Maps model answers onto catalog postings, in answer order, without duplicates,
/// dropping anything that matches nothing. Never returns more than `MAX_RECOMMENDATIONS`.
pub fn resolve_against_catalog(answers: &[RecommendedJob], catalog: &[JobPosting]) -> Vec<JobPosting> {
    let mut chosen: HashSet<Uuid> = HashSet::new();
    let mut resolved = Vec::new();

    for answer in answers {
        if resolved.len() == MAX_RECOMMENDATIONS {
            break;
        }

        let (id, title) = match answer {
            RecommendedJob::Title(title) => (None, Some(title.as_str())),
            RecommendedJob::Entry { id, title } => (id.as_deref(), title.as_deref()),
        };

        let by_id = id
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .and_then(|id| catalog.iter().find(|j| j.id == id && !chosen.contains(&j.id)));

        let by_title = || {
            title.and_then(|t| {
                catalog
                    .iter()
                    .find(|j| j.title == t && !chosen.contains(&j.id))
            })
        };

        match by_id.or_else(by_title) {
            Some(job) => {
                chosen.insert(job.id);
                resolved.push(job.clone());
            }
            None => warn!("Discarding recommendation not in catalog: id={id:?} title={title:?}"),
        }
    }

    resolved
}
