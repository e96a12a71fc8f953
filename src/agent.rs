//! Summarisation entry point shared by every front-end.
//!
//! Validates the URL, resolves the model, and hands the request to a
//! [`GenerationProvider`] under a timeout. No retries, no caching.

use crate::config::Config;
use crate::gemini::{GeminiClient, GeminiError, GenerationProvider};
use crate::summary::{Summary, SummaryRequest};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("a video URL is required")]
    EmptyInput,
    #[error("not a valid http(s) URL: {0}")]
    InvalidUrl(String),
    #[error("invalid model identifier: {0:?}")]
    InvalidModel(String),
    #[error("failed to create genai client: {0}")]
    ClientConstructionFailed(String),
    #[error("failed to generate content: {0}")]
    GenerationFailed(String),
    #[error("generation timed out after {0}s")]
    Timeout(u64),
}

impl From<GeminiError> for AgentError {
    fn from(err: GeminiError) -> Self {
        if err.is_client_construction() {
            AgentError::ClientConstructionFailed(err.to_string())
        } else {
            AgentError::GenerationFailed(err.to_string())
        }
    }
}

/// Check that `input` is something the provider could plausibly fetch.
///
/// Returns the trimmed URL.
pub fn validate_url(input: &str) -> Result<String, AgentError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AgentError::EmptyInput);
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| AgentError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(trimmed.to_string()),
        _ => Err(AgentError::InvalidUrl(trimmed.to_string())),
    }
}

/// Check that `model` is a bare model identifier.
///
/// A leading `models/` is accepted and stripped. What remains is spliced
/// into the provider path, so only ASCII letters, digits, `.`, `_` and `-`
/// are allowed and it must start with a letter or digit.
pub fn validate_model(model: &str) -> Result<&str, AgentError> {
    let name = model.strip_prefix("models/").unwrap_or(model);
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(name)
    } else {
        Err(AgentError::InvalidModel(model.to_string()))
    }
}

/// The façade front-ends call to obtain a summary.
#[derive(Clone)]
pub struct Summarizer {
    config: Arc<Config>,
    provider: Arc<dyn GenerationProvider>,
}

impl Summarizer {
    /// Build a summariser backed by the Gemini client
    pub fn from_config(config: Config) -> Result<Self, AgentError> {
        let client = GeminiClient::from_config(&config)?;
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    pub fn with_provider(config: Config, provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Effective `(model, api_version)` pair
    pub fn model_info(&self) -> (&str, &str) {
        (&self.config.agent.model, &self.config.agent.api_version)
    }

    /// Summarise `url` with the configured model
    pub async fn summarize(&self, url: &str) -> Result<String, AgentError> {
        let model = self.config.agent.model.clone();
        self.summarize_with_model(url, &model).await
    }

    /// Summarise `url` with an explicit model; a blank model means the configured one
    pub async fn summarize_with_model(&self, url: &str, model: &str) -> Result<String, AgentError> {
        let url = validate_url(url)?;
        let model = match model.trim() {
            "" => self.config.agent.model.as_str(),
            m => m,
        };
        let model = validate_model(model)?;
        let request = SummaryRequest::new(url, model, self.config.agent.api_version.as_str());

        self.run(request).await.map(String::from)
    }

    async fn run(&self, request: SummaryRequest) -> Result<Summary, AgentError> {
        let timeout = self.config.request_timeout();
        info!(url = %request.url, model = %request.model, "generating summary");
        let started = Instant::now();

        let generation = self.provider.generate(&request);
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, generation).await {
                Ok(result) => result.map_err(AgentError::from),
                Err(_) => Err(AgentError::Timeout(limit.as_secs())),
            },
            None => generation.await.map_err(AgentError::from),
        };

        match &result {
            Ok(summary) => info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = summary.text.len(),
                "summary generated"
            ),
            Err(e) => error!(url = %request.url, model = %request.model, "summary failed: {}", e),
        }

        result
    }
}
