//! Structured response parsing: turns a free-text completion into a typed result.
//!
//! The model is instructed to answer with JSON only. Parsing trims surrounding
//! whitespace (and a markdown fence, if the model added one) and deserializes
//! directly; there is no brace-scanning recovery.
//!
//! Field matching is case-insensitive: object keys are folded to lowercase with
//! `_` and `-` removed before deserialization, so `MissingSkills`, `missingSkills`
//! and `missing_skills` all land on a field renamed to `missingskills`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{ChatModel, GenerativeRequest};

/// Longest slice of offending model output kept inside a `Parse` error.
const MAX_RAW_IN_ERROR: usize = 2000;

/// What a feature does when its model call or parse fails.
///
/// Core features `Throw`; soft features substitute a default so the request
/// never breaks.
pub enum OnParseFailure<T> {
    Throw,
    DefaultValue(fn() -> T),
}

// Manual impls: a derive would demand `T: Copy`.
impl<T> Clone for OnParseFailure<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OnParseFailure<T> {}

impl<T> OnParseFailure<T> {
    /// Applies the policy to the outcome of a structured request.
    pub fn resolve(&self, task: &str, result: Result<T, AppError>) -> Result<T, AppError> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (OnParseFailure::Throw, Err(e)) => Err(e),
            (OnParseFailure::DefaultValue(fallback), Err(e)) => {
                warn!("{task}: substituting default result after failure: {e}");
                Ok(fallback())
            }
        }
    }
}

/// Sends `request` through the gateway and decodes the completion as `T`,
/// then applies `policy`. Gateway errors carry the upstream status and body.
pub async fn request_structured<T: DeserializeOwned>(
    model: &dyn ChatModel,
    task: &str,
    request: &GenerativeRequest,
    policy: OnParseFailure<T>,
) -> Result<T, AppError> {
    let result = match model.complete(request).await {
        Ok(text) => parse_structured::<T>(&text),
        Err(e) => Err(AppError::Gateway(e)),
    };
    policy.resolve(task, result)
}

/// Decodes a completion into `T`, failing with `AppError::Parse` that includes
/// the offending text.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    let text = strip_json_fences(raw);

    if text.is_empty() {
        return Err(parse_error("empty model output", raw));
    }

    let value: Value = serde_json::from_str(text).map_err(|e| parse_error(e, raw))?;
    serde_json::from_value(fold_keys(value)).map_err(|e| parse_error(e, raw))
}

fn parse_error(reason: impl ToString, raw: &str) -> AppError {
    AppError::Parse {
        reason: reason.to_string(),
        raw: raw.chars().take(MAX_RAW_IN_ERROR).collect(),
    }
}

/// Recursively folds every object key to its case-insensitive form.
pub fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (fold_key(&k), fold_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
