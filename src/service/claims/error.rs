//! Error types for claim validation

use thiserror::Error;

use crate::db::DbError;
use crate::service::llm::LlmError;

/// Failure while turning candidate studies into a verdict
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthesisError {
    #[error("Reasoning backend not configured: {0}")]
    Configuration(String),

    #[error("Reasoning backend request failed: {0}")]
    Upstream(String),

    #[error("Malformed reasoning backend response: {0}")]
    MalformedResponse(String),
}

impl From<LlmError> for SynthesisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured(msg) => SynthesisError::Configuration(msg),
            LlmError::InvalidEnvelope(msg) => SynthesisError::MalformedResponse(msg),
            other => SynthesisError::Upstream(other.to_string()),
        }
    }
}

/// Error type for the claim validation pipeline
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClaimValidationError {
    #[error("{0}")]
    InvalidClaim(String),

    #[error("Study lookup failed: {0}")]
    Storage(#[from] DbError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}
