// All model prompt constants for job recommendation.

/// System prompt for catalog ranking.
pub const RECOMMENDATION_SYSTEM: &str = "You are an AI job-matching assistant that finds \
    the best job matches based on skills, experience, and behavioral data.";

/// Ranking prompt template.
/// Replace: {name}, {skills}, {experience}, {preferences}, {catalog}, {json_only}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Match {name} to the best jobs based on:
- Skills: {skills}
- Experience: {experience}
- Job Preferences: {preferences}

Available Jobs:
{catalog}

Rank the best matching jobs, best first. Only choose jobs from the list above and copy
each chosen job's id and title exactly as written.

Respond with a JSON object:
{
  "jobs": [
    {"id": "job id from the list", "title": "exact job title", "score": 92, "reason": "why it fits"}
  ]
}

{json_only}"#;
