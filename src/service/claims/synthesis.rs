//! Evidence synthesis: reasoning backend judgment to validation result
//!
//! The backend only ever sees studies by their 1-based prompt position.
//! Its key study references are mapped back onto database ids here.

use std::sync::Arc;

use crate::model::{ExtractedJudgment, ExtractedKeyStudy, KeyStudy, Study, ValidationResult};
use crate::service::claims::error::SynthesisError;
use crate::service::claims::prompts::build_validation_prompt;
use crate::service::llm::ReasoningBackend;

const CODE_FENCE: &str = "```";

/// Asks the reasoning backend for a structured judgment on a claim
pub struct EvidenceSynthesizer {
    backend: Arc<dyn ReasoningBackend>,
    max_tokens: u32,
}

impl EvidenceSynthesizer {
    pub fn new(backend: Arc<dyn ReasoningBackend>, max_tokens: u32) -> Self {
        Self {
            backend,
            max_tokens,
        }
    }

    /// Validate a claim against candidate studies
    ///
    /// Makes exactly one backend call. Key studies that reference a position
    /// outside the candidate list are dropped.
    pub async fn validate_claim_against_studies(
        &self,
        claim: &str,
        studies: &[Study],
    ) -> Result<ValidationResult, SynthesisError> {
        let prompt = build_validation_prompt(claim, studies);
        let prompt_length = prompt.len();

        tracing::debug!(
            candidate_count = studies.len(),
            prompt_length = prompt_length,
            "Initiating reasoning backend call for claim validation"
        );

        let start_time = std::time::Instant::now();

        let completion = match self.backend.complete(&prompt, self.max_tokens).await {
            Ok(completion) => {
                tracing::info!(
                    model = %completion.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    response_length = completion.text.len(),
                    "Reasoning backend call for claim validation completed"
                );
                completion
            }
            Err(e) => {
                tracing::error!(
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "Reasoning backend call for claim validation failed"
                );
                return Err(e.into());
            }
        };

        let judgment = parse_judgment(&completion.text)?;

        if judgment.evidence.total() > studies.len() as u64 {
            tracing::warn!(
                supporting = judgment.evidence.supporting,
                mixed = judgment.evidence.mixed,
                refuting = judgment.evidence.refuting,
                candidate_count = studies.len(),
                "Evidence breakdown counts more studies than were provided"
            );
        }

        let reported = judgment.key_studies.len();
        let key_studies = repair_key_studies(judgment.key_studies, studies);

        if key_studies.len() < reported {
            tracing::warn!(
                reported = reported,
                kept = key_studies.len(),
                candidate_count = studies.len(),
                "Dropped key studies with out-of-range references"
            );
        }

        Ok(ValidationResult {
            verdict: judgment.verdict,
            confidence: judgment.confidence,
            summary: judgment.summary,
            evidence: judgment.evidence,
            key_studies,
            bottom_line: judgment.bottom_line,
        })
    }
}

/// Remove a Markdown code fence around the reply, if any
///
/// Keeps the text between the opening fence and the next fence, minus a
/// leading `json` language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(CODE_FENCE) else {
        return trimmed;
    };

    let inner = match rest.find(CODE_FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };

    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Decode the backend reply into a typed judgment
pub fn parse_judgment(text: &str) -> Result<ExtractedJudgment, SynthesisError> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| SynthesisError::MalformedResponse(e.to_string()))
}

/// Map 1-based study positions onto database ids
///
/// Out-of-range entries are dropped. A missing title falls back to the
/// study's own title, a missing finding to the empty string.
pub fn repair_key_studies(extracted: Vec<ExtractedKeyStudy>, studies: &[Study]) -> Vec<KeyStudy> {
    extracted
        .into_iter()
        .filter_map(|ks| {
            let position = usize::try_from(ks.id.checked_sub(1)?).ok()?;
            let study = studies.get(position)?;
            Some(KeyStudy {
                id: study.id,
                title: ks.title.unwrap_or_else(|| study.title.clone()),
                finding: ks.finding.unwrap_or_default(),
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::{Reply, ScriptedBackend};
    use super::*;
    use crate::model::{Confidence, EvidenceBreakdown, Verdict};
    use crate::service::claims::retrieval::testing::study;

    const VALID_REPLY: &str = r#"{
        "verdict": "SUPPORTED",
        "confidence": "high",
        "summary": "Both studies report quadriceps hypertrophy after heavy squatting.",
        "evidence": {"supporting": 2, "mixed": 0, "refuting": 0},
        "key_studies": [
            {"id": 1, "title": "Squat depth and quadriceps growth", "finding": "Deep squats grew the quads."},
            {"id": 2, "title": "Heavy vs light squats", "finding": "Heavy loads matched light loads to failure."}
        ],
        "bottom_line": "Heavy squats reliably grow the quadriceps."
    }"#;

    fn synthesizer(backend: Arc<ScriptedBackend>) -> EvidenceSynthesizer {
        EvidenceSynthesizer::new(backend, 2048)
    }

    fn candidates() -> Vec<Study> {
        vec![
            study(101, "Squat depth and quadriceps growth", Some("...")),
            study(205, "Heavy vs light squats", Some("...")),
            study(9, "Leg press volume", None),
        ]
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  ```json\n{\"a\": 1}\n```\ntrailing"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_and_plain_replies_parse_identically() {
        let fenced = format!("```json\n{}\n```", VALID_REPLY);
        let bare_fence = format!("```\n{}\n```", VALID_REPLY);

        let plain = parse_judgment(VALID_REPLY).unwrap();
        for text in [fenced, bare_fence] {
            let parsed = parse_judgment(&text).unwrap();
            assert_eq!(parsed.verdict, plain.verdict);
            assert_eq!(parsed.confidence, plain.confidence);
            assert_eq!(parsed.summary, plain.summary);
            assert_eq!(parsed.evidence, plain.evidence);
            assert_eq!(parsed.key_studies.len(), plain.key_studies.len());
            assert_eq!(parsed.bottom_line, plain.bottom_line);
        }
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let reply = r#"{"verdict": "SUPPORTED", "confidence": "high", "summary": "s",
            "evidence": {"supporting": 1, "mixed": 0, "refuting": 0}, "key_studies": []}"#;
        assert!(matches!(
            parse_judgment(reply),
            Err(SynthesisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let reply = r#"{"verdict": "SUPPORTED", "confidence": "certain", "summary": "s",
            "evidence": {"supporting": 1, "mixed": 0, "refuting": 0},
            "key_studies": [], "bottom_line": "b"}"#;
        assert!(matches!(
            parse_judgment(reply),
            Err(SynthesisError::MalformedResponse(_))
        ));

        assert!(matches!(
            parse_judgment("I think the claim is supported."),
            Err(SynthesisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_repair_maps_positions_and_drops_out_of_range() {
        let extracted = vec![
            ExtractedKeyStudy {
                id: 2,
                title: Some("Heavy vs light".to_string()),
                finding: Some("Similar growth.".to_string()),
            },
            ExtractedKeyStudy {
                id: 9,
                title: Some("Ghost".to_string()),
                finding: Some("Not a candidate.".to_string()),
            },
        ];

        let repaired = repair_key_studies(extracted, &candidates());

        assert_eq!(repaired.len(), 1);
        assert_eq!(repaired[0].id, 205);
        assert_eq!(repaired[0].title, "Heavy vs light");
        assert_eq!(repaired[0].finding, "Similar growth.");
    }

    #[test]
    fn test_repair_rejects_zero_and_negative_positions() {
        let extracted = vec![
            ExtractedKeyStudy { id: 0, title: None, finding: None },
            ExtractedKeyStudy { id: -3, title: None, finding: None },
            ExtractedKeyStudy { id: 4, title: None, finding: None },
        ];

        assert!(repair_key_studies(extracted, &candidates()).is_empty());
    }

    #[test]
    fn test_repair_defaults_title_and_finding() {
        let extracted = vec![ExtractedKeyStudy { id: 3, title: None, finding: None }];

        let repaired = repair_key_studies(extracted, &candidates());

        assert_eq!(
            repaired,
            vec![KeyStudy {
                id: 9,
                title: "Leg press volume".to_string(),
                finding: String::new(),
            }]
        );
    }

    #[tokio::test]
    async fn test_end_to_end_squat_claim() {
        let backend = Arc::new(ScriptedBackend::text(VALID_REPLY));
        let studies = vec![
            study(101, "Squat depth and quadriceps growth", Some("...")),
            study(205, "Heavy vs light squats", Some("...")),
        ];

        let result = synthesizer(backend.clone())
            .validate_claim_against_studies("Heavy squats increase quad muscle size", &studies)
            .await
            .unwrap();

        assert_eq!(result.verdict, Verdict::Supported);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.evidence,
            EvidenceBreakdown { supporting: 2, mixed: 0, refuting: 0 }
        );
        let ids: Vec<i64> = result.key_studies.iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![101, 205]);
        assert_eq!(result.key_studies[1].finding, "Heavy loads matched light loads to failure.");
        assert_eq!(result.bottom_line, "Heavy squats reliably grow the quadriceps.");
        assert_eq!(backend.call_count(), 1);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Heavy squats increase quad muscle size"));
        assert!(prompts[0].contains("<study number from 1-2>"));
    }

    #[tokio::test]
    async fn test_identity_repair_through_synthesizer() {
        let reply = r#"```json
{
  "verdict": "PARTIALLY_SUPPORTED",
  "confidence": "moderate",
  "summary": "Mixed.",
  "evidence": {"supporting": 1, "mixed": 1, "refuting": 0},
  "key_studies": [
    {"id": 2, "title": "Heavy vs light squats", "finding": "Comparable growth."},
    {"id": 9, "title": "Unknown", "finding": "Hallucinated reference."}
  ],
  "bottom_line": "Load matters less than effort."
}
```"#;
        let backend = Arc::new(ScriptedBackend::text(reply));

        let result = synthesizer(backend)
            .validate_claim_against_studies("Only heavy loads build muscle", &candidates())
            .await
            .unwrap();

        assert_eq!(result.verdict, Verdict::PartiallySupported);
        assert_eq!(result.key_studies.len(), 1);
        assert_eq!(result.key_studies[0].id, 205);
    }

    #[tokio::test]
    async fn test_upstream_status_is_error() {
        let backend = Arc::new(ScriptedBackend::new(Reply::Status(500)));

        let result = synthesizer(backend.clone())
            .validate_claim_against_studies("Heavy squats increase quad muscle size", &candidates())
            .await;

        assert!(matches!(result, Err(SynthesisError::Upstream(_))));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_error() {
        let backend = Arc::new(ScriptedBackend::new(Reply::Timeout));

        let result = synthesizer(backend.clone())
            .validate_claim_against_studies("Heavy squats increase quad muscle size", &candidates())
            .await;

        assert!(matches!(result, Err(SynthesisError::Upstream(msg)) if msg.contains("timed out")));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_evidence_counts_pass_through_unchecked() {
        let reply = VALID_REPLY.replace(r#""supporting": 2"#, r#""supporting": 12"#);
        let backend = Arc::new(ScriptedBackend::text(reply));

        let result = synthesizer(backend)
            .validate_claim_against_studies("Heavy squats increase quad muscle size", &candidates())
            .await
            .unwrap();

        assert_eq!(result.evidence.supporting, 12);
    }
}
