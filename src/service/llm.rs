//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for OpenAI API interactions used across services.

use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::model::LlmConfig;

/// Errors surfaced by the model provider, classified by what the caller can do
/// about them
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("Failed to create OpenAI client: {0}")]
    ClientInit(String),

    #[error("Model provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Model provider rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model call failed: {0}")]
    Failed(String),
}

impl LlmError {
    /// Classify a provider error by the markers found in its message
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("429") || lower.contains("rate limit") {
            LlmError::RateLimited(message)
        } else if lower.contains("401") || lower.contains("api key") || lower.contains("unauthorized")
        {
            LlmError::Unauthorized(message)
        } else {
            LlmError::Failed(message)
        }
    }
}

/// A text-completion model: one preamble plus one prompt in, raw text out
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str, config: LlmConfig) -> Result<Self, LlmError> {
        let client =
            openai::Client::new(api_key).map_err(|e| LlmError::ClientInit(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, LlmError> {
        let agent = self
            .client
            .agent(&self.config.model)
            .preamble(preamble)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            agent.prompt(prompt),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.config.timeout_secs))?
        .map_err(|e| LlmError::classify(e.to_string()))?;

        if response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
