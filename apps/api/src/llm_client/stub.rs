//! Deterministic `CompletionClient` for tests.
//!
//! Replies are keyed by the request's system prompt, so each pipeline stage
//! can be scripted independently of call order. Every request is recorded.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, CompletionRequest, LlmError};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure { status: u16, message: String },
}

#[derive(Default)]
pub struct ScriptedCompletion {
    replies: HashMap<&'static str, Reply>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request carrying `system` with `text`.
    pub fn reply(mut self, system: &'static str, text: &str) -> Self {
        self.replies.insert(system, Reply::Text(text.to_string()));
        self
    }

    /// Fail every request carrying `system` with an API error.
    pub fn fail(mut self, system: &'static str, status: u16, message: &str) -> Self {
        self.replies.insert(
            system,
            Reply::Failure {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts_for(&self, system: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.system == system)
            .map(|c| c.prompt)
            .collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.replies.get(request.system) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Failure { status, message }) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Err(LlmError::Api {
                status: 500,
                message: format!("no scripted reply for system prompt: {}", request.system),
            }),
        }
    }
}
