//! Test double for the gateway seam.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatModel, GenerativeRequest, LlmError};

/// Replays a fixed script of completions and records every request it sees.
/// Once the script runs out, `repeat` (if set) is returned for every further call.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    repeat: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerativeRequest>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self {
            repeat: Some(text.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerativeRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Concatenated user-message content of the n-th request.
    pub fn prompt(&self, n: usize) -> String {
        self.requests()[n]
            .messages
            .iter()
            .filter(|m| m.role == super::Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: &GenerativeRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => self.repeat.clone().ok_or(LlmError::EmptyContent),
        }
    }
}
