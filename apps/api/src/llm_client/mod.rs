/// LLM Client: the single point of entry for all generative model calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat-completion endpoint directly.
/// Services build a `GenerativeRequest` and hand it to a `ChatModel`.
///
/// Two calling conventions sit on top of `ChatModel::complete`:
/// - `generate_text` for free-form generation: failures degrade to a sentinel string.
/// - `structured::request_structured` for JSON extraction: failures surface as errors
///   unless the feature declares a default value.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod prompts;
pub mod structured;

#[cfg(test)]
pub mod testing;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Model used for recommendation, auto-apply texts, hiring score and skill gap.
pub const TURBO_MODEL: &str = "gpt-4-turbo";
/// Model used for CV extraction, resume optimization and interview questions.
pub const STANDARD_MODEL: &str = "gpt-4";

/// Returned by `generate_text` when the endpoint answers with a non-success status.
pub const GENERATION_FAILED: &str = "Error generating content.";
/// Returned by `generate_text` on transport failure or an unusable response envelope.
pub const PROCESSING_FAILED: &str = "Error processing AI response.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// `message` is the raw response body.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ephemeral description of one model call. Serializes directly as the
/// chat-completion payload `{model, messages, max_tokens, temperature}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerativeRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    /// 0.0 = deterministic, 1.0 = creative.
    pub temperature: f32,
}

impl GenerativeRequest {
    pub fn new(model: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            messages: Vec::new(),
            max_tokens,
            temperature,
        }
    }

    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(content));
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(content));
        self
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl CompletionResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The gateway seam. Production uses `LlmClient`; tests use a scripted model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Issues one logical completion and returns the raw text of the first choice.
    async fn complete(&self, request: &GenerativeRequest) -> Result<String, LlmError>;
}

/// Chat-completion client. Injects the bearer credential, enforces a per-call
/// timeout, and retries 429/5xx/transport failures with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

/// First backoff delay; doubles on each further attempt (1s, 2s, 4s).
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

impl LlmClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            timeout,
            max_retries: max_retries.max(1),
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    /// Overrides the first backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, request: &GenerativeRequest) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * (1u32 << (attempt - 1));
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(self.classify(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                    error!("Model API rejected request ({}): {}", status, envelope.error.message);
                }
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let body = response.text().await.map_err(|e| self.classify(e))?;
            let completion: CompletionResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &completion.usage {
                debug!(
                    "Model call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    request.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return completion.into_text().ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}

/// Free-form generation for fire-and-forget paths (cover letters, resume rewrites).
/// Never fails: upstream problems are logged and replaced by a sentinel string.
pub async fn generate_text(model: &dyn ChatModel, request: &GenerativeRequest) -> String {
    match model.complete(request).await {
        Ok(text) => text,
        Err(LlmError::Api { status, message }) => {
            error!("Model API call failed: {status} {message}");
            GENERATION_FAILED.to_string()
        }
        Err(e) => {
            error!("Error in model request: {e}");
            PROCESSING_FAILED.to_string()
        }
    }
}
