//! Reasoning backend client
//!
//! Provides the [`ReasoningBackend`] seam used by claim validation and study
//! summaries, and its implementation over the Anthropic Messages API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::LlmConfig;

/// Environment variable holding the backend credential
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("Reasoning backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request to reasoning backend timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reasoning backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),
}

/// Text produced by a single completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// Model that served the request, as reported by the backend
    pub model: String,
}

/// Single-turn text completion
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Send one user message and return the first text block of the reply
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError>;
}

/// API key; `SecretString` keeps it out of `Debug` output and logs
#[derive(Clone, Debug)]
pub struct ApiCredential(SecretString);

impl ApiCredential {
    pub fn new(value: impl Into<String>) -> Result<Self, LlmError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LlmError::NotConfigured("empty API key".to_string()));
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Read the credential from `ANTHROPIC_API_KEY`
    pub fn from_env() -> Result<Self, LlmError> {
        let value = std::env::var(ENV_ANTHROPIC_API_KEY)
            .map_err(|_| LlmError::NotConfigured(format!("{} not set", ENV_ANTHROPIC_API_KEY)))?;
        Self::new(value)
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic Messages API
#[derive(Clone, Debug)]
pub struct AnthropicClient {
    client: Client,
    credential: ApiCredential,
    api_url: Url,
    model: String,
}

impl AnthropicClient {
    /// Create a client with a bounded request timeout
    pub fn new(config: &LlmConfig, credential: ApiCredential) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        tracing::info!(
            api_url = %config.api_url,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "Reasoning backend client initialized"
        );

        Ok(Self {
            client,
            credential,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReasoningBackend for AnthropicClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.api_url.clone())
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { LlmError::Timeout } else { LlmError::Http(e) })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| if e.is_timeout() { LlmError::Timeout } else { LlmError::Http(e) })?;

        parse_envelope(&body, &self.model)
    }
}

/// Extract the first text block from a Messages API response body
fn parse_envelope(body: &str, requested_model: &str) -> Result<Completion, LlmError> {
    let envelope: MessagesResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidEnvelope(e.to_string()))?;

    let text = envelope
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| LlmError::InvalidEnvelope("no text content block".to_string()))?;

    Ok(Completion {
        text,
        model: envelope
            .model
            .unwrap_or_else(|| requested_model.to_string()),
    })
}
