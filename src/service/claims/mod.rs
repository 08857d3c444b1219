//! Fitness claim validation service
//!
//! Extracts keywords from a claim, retrieves matching studies and asks the
//! reasoning backend for a verdict grounded in those studies.

use std::sync::Arc;

use crate::model::ValidationResult;
use crate::service::llm::ReasoningBackend;

pub mod error;
pub mod keywords;
pub mod prompts;
pub mod retrieval;
pub mod synthesis;

pub use error::{ClaimValidationError, SynthesisError};
pub use keywords::extract_keywords;
pub use retrieval::{DEFAULT_CANDIDATE_LIMIT, StudySource, search_relevant_studies};
pub use synthesis::EvidenceSynthesizer;

/// Claims shorter than this (after trimming) are rejected
pub const MIN_CLAIM_CHARS: usize = 10;

/// Service for validating claims against the study corpus
pub struct ClaimValidationService {
    studies: Arc<dyn StudySource>,
    synthesizer: EvidenceSynthesizer,
    candidate_limit: usize,
}

impl ClaimValidationService {
    pub fn new(
        studies: Arc<dyn StudySource>,
        backend: Arc<dyn ReasoningBackend>,
        max_tokens: u32,
        candidate_limit: usize,
    ) -> Self {
        tracing::info!(
            candidate_limit = candidate_limit,
            max_tokens = max_tokens,
            "Claim validation service initialized"
        );
        Self {
            studies,
            synthesizer: EvidenceSynthesizer::new(backend, max_tokens),
            candidate_limit,
        }
    }

    /// Validate a claim
    ///
    /// Claims with no matching study get the canned insufficient-evidence
    /// result without a backend call.
    pub async fn validate(&self, claim: &str) -> Result<ValidationResult, ClaimValidationError> {
        let claim_length = claim.trim().chars().count();
        if claim_length < MIN_CLAIM_CHARS {
            return Err(ClaimValidationError::InvalidClaim(format!(
                "Claim must be at least {} characters long",
                MIN_CLAIM_CHARS
            )));
        }

        let keywords = extract_keywords(claim);
        let candidates =
            search_relevant_studies(self.studies.as_ref(), &keywords, self.candidate_limit).await?;

        tracing::debug!(
            claim_length = claim_length,
            keyword_count = keywords.len(),
            candidate_count = candidates.len(),
            "Claim candidates resolved"
        );

        if candidates.is_empty() {
            tracing::info!(
                keyword_count = keywords.len(),
                "No candidate studies for claim, returning insufficient evidence"
            );
            return Ok(ValidationResult::insufficient_evidence());
        }

        let result = self
            .synthesizer
            .validate_claim_against_studies(claim, &candidates)
            .await?;

        tracing::info!(
            verdict = ?result.verdict,
            confidence = ?result.confidence,
            candidate_count = candidates.len(),
            key_study_count = result.key_studies.len(),
            "Claim validation complete"
        );

        Ok(result)
    }
}
