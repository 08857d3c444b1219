//! Claim validation models
//!
//! `ValidationResult` is the response contract. The `Extracted*` types mirror
//! the JSON the reasoning backend is instructed to produce, before study
//! references are mapped back to database ids.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Supported,
    PartiallySupported,
    NotSupported,
    InsufficientEvidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

/// How the candidate studies relate to the claim, as reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvidenceBreakdown {
    pub supporting: u32,
    pub mixed: u32,
    pub refuting: u32,
}

impl EvidenceBreakdown {
    pub fn total(&self) -> u64 {
        u64::from(self.supporting) + u64::from(self.mixed) + u64::from(self.refuting)
    }
}

/// A study singled out as most relevant, identified by its database id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KeyStudy {
    pub id: i64,
    pub title: String,
    pub finding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationResult {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub summary: String,
    pub evidence: EvidenceBreakdown,
    pub key_studies: Vec<KeyStudy>,
    pub bottom_line: String,
}

impl ValidationResult {
    /// Canned answer for claims that matched no study in the corpus
    pub fn insufficient_evidence() -> Self {
        Self {
            verdict: Verdict::InsufficientEvidence,
            confidence: Confidence::Low,
            summary: "We don't have enough relevant studies in our database to validate this claim."
                .to_string(),
            evidence: EvidenceBreakdown::default(),
            key_studies: Vec::new(),
            bottom_line: "More research needed. Try rephrasing your claim or check back as we add more studies."
                .to_string(),
        }
    }
}

/// Backend judgment as decoded from the reply text
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedJudgment {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub summary: String,
    pub evidence: EvidenceBreakdown,
    pub key_studies: Vec<ExtractedKeyStudy>,
    pub bottom_line: String,
}

/// Key study reference where `id` is the 1-based position in the prompt
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedKeyStudy {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub finding: Option<String>,
}

/// Request body for claim validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimRequest {
    pub claim: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(
            serde_json::to_value(Verdict::PartiallySupported).unwrap(),
            "PARTIALLY_SUPPORTED"
        );
        assert_eq!(
            serde_json::to_value(Verdict::InsufficientEvidence).unwrap(),
            "INSUFFICIENT_EVIDENCE"
        );
        assert_eq!(serde_json::to_value(Confidence::Moderate).unwrap(), "moderate");
    }

    #[test]
    fn test_unknown_verdict_rejected() {
        let result: Result<Verdict, _> = serde_json::from_str("\"MOSTLY_TRUE\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_evidence_count_rejected() {
        let result: Result<EvidenceBreakdown, _> =
            serde_json::from_str(r#"{"supporting": -1, "mixed": 0, "refuting": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_insufficient_evidence_shape() {
        let result = ValidationResult::insufficient_evidence();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["verdict"], "INSUFFICIENT_EVIDENCE");
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["evidence"]["supporting"], 0);
        assert_eq!(json["evidence"]["mixed"], 0);
        assert_eq!(json["evidence"]["refuting"], 0);
        assert_eq!(json["key_studies"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_key_study_title_and_finding_optional() {
        let ks: ExtractedKeyStudy = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(ks.id, 3);
        assert!(ks.title.is_none());
        assert!(ks.finding.is_none());
    }
}
