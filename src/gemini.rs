//! Gemini `generateContent` client.
//!
//! Sends the instruction prompt together with a reference to the remote video
//! and returns the aggregated text of the first candidate.

use crate::config::Config;
use crate::summary::{Summary, SummaryRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("vidsumma/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// MIME type attached to every media reference
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("missing API key: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("prompt blocked: {0}")]
    Blocked(String),
    #[error("response contained no candidates")]
    NoCandidates,
}

impl GeminiError {
    /// True when the failure happened before any request left the process
    pub fn is_client_construction(&self) -> bool {
        matches!(self, GeminiError::MissingApiKey | GeminiError::ClientBuild(_))
    }
}

/// Anything that can turn a video reference into a markdown summary.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, request: &SummaryRequest) -> Result<Summary, GeminiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    /// Set by thinking models on reasoning parts, which are not part of the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn video(uri: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                file_uri: uri.into(),
                mime_type: VIDEO_MIME_TYPE.to_string(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// One user turn holding the prompt and the video, with an output cap.
    pub fn for_video(prompt: &str, url: &str, max_output_tokens: Option<u32>) -> Self {
        let contents = vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(prompt), Part::video(url)],
        }];

        match max_output_tokens {
            Some(cap) => Self {
                contents,
                system_instruction: Some(Content {
                    role: None,
                    parts: vec![Part::text(format!(
                        "Keep your answer below {} tokens.",
                        cap
                    ))],
                }),
                generation_config: Some(GenerationConfig {
                    max_output_tokens: cap,
                }),
            },
            None => Self {
                contents,
                system_instruction: None,
                generation_config: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, skipping thought parts
    pub fn text(&self) -> Result<String, GeminiError> {
        let Some(candidate) = self.candidates.first() else {
            return match self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
            {
                Some(reason) => Err(GeminiError::Blocked(reason)),
                None => Err(GeminiError::NoCandidates),
            };
        };

        if self.candidates.len() > 1 {
            debug!(
                count = self.candidates.len(),
                "multiple candidates returned, using the first"
            );
        }

        let text = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();

        if text.is_empty() {
            warn!(
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                "candidate contained no text"
            );
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    prompt: String,
    max_output_tokens: Option<u32>,
}

impl GeminiClient {
    /// Build a client from the agent and API sections of the configuration
    pub fn from_config(config: &Config) -> Result<Self, GeminiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(GeminiError::ClientBuild)?;

        Ok(Self {
            http,
            api_key: config.api.gemini_key.clone(),
            base_url: config.agent.base_url.trim_end_matches('/').to_string(),
            prompt: config.agent.prompt.clone(),
            max_output_tokens: Some(config.agent.max_output_tokens).filter(|&cap| cap > 0),
        })
    }

    fn endpoint(&self, request: &SummaryRequest) -> String {
        let model = request
            .model
            .strip_prefix("models/")
            .unwrap_or(&request.model);
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, request.api_version, model
        )
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, request: &SummaryRequest) -> Result<Summary, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let body =
            GenerateContentRequest::for_video(&self.prompt, &request.url, self.max_output_tokens);
        let endpoint = self.endpoint(request);
        debug!(%endpoint, "sending generateContent request");

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeminiError::Decode(e.to_string()))?;

        Ok(Summary::new(parsed.text()?))
    }
}
