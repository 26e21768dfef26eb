//! Session: the scope of one user's API key.
//!
//! A session is opened per request from the key the user supplied, handed to
//! the pipeline, and dropped when the response is sent. The key is never
//! logged or stored anywhere else.

use std::time::Duration;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{CompletionClient, LlmClient};

pub struct Session {
    llm: LlmClient,
}

impl Session {
    pub fn open(api_key: Option<String>, config: &Config) -> Result<Self, AppError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Please provide your language-model API key.".to_string())
            })?;

        let llm = LlmClient::new(
            api_key,
            config.llm_api_url.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build LLM client: {e}")))?;

        Ok(Self { llm })
    }

    pub fn completion(&self) -> &dyn CompletionClient {
        &self.llm
    }
}
