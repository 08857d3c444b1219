//! Prompts for claim validation

use std::fmt::Write;

use crate::model::Study;

/// Render candidate studies as numbered blocks
///
/// Studies are numbered by 1-based position in `studies`, never by database
/// id. The backend refers back to them by that number.
pub fn render_studies(studies: &[Study]) -> String {
    let mut out = String::new();
    for (i, study) in studies.iter().enumerate() {
        let year = study
            .publication_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        // Writing to a String cannot fail
        let _ = write!(
            out,
            "\n\nStudy {}:\nTitle: {}\nAuthors: {}\nYear: {}\nAbstract: {}\n",
            i + 1,
            study.title,
            non_empty(study.authors.as_deref()).unwrap_or("N/A"),
            year,
            non_empty(study.abstract_text.as_deref()).unwrap_or("No abstract available"),
        );
    }
    out
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Build the validation prompt for a claim and its candidate studies
pub fn build_validation_prompt(claim: &str, studies: &[Study]) -> String {
    format!(
        r#"You are an expert exercise scientist analyzing a fitness claim against scientific research.

CLAIM TO VALIDATE:
"{claim}"

RELEVANT RESEARCH STUDIES:
{studies_text}

Based on these studies, provide a structured analysis in the following JSON format:

{{
  "verdict": "SUPPORTED" | "PARTIALLY_SUPPORTED" | "NOT_SUPPORTED" | "INSUFFICIENT_EVIDENCE",
  "confidence": "high" | "moderate" | "low",
  "summary": "2-3 sentence summary of what the research shows",
  "evidence": {{
    "supporting": <number of studies that support the claim>,
    "mixed": <number of studies with mixed/nuanced findings>,
    "refuting": <number of studies that contradict the claim>
  }},
  "key_studies": [
    {{
      "id": <study number from 1-{count}>,
      "title": "study title",
      "finding": "1 sentence on what this study found regarding the claim"
    }}
  ],
  "bottom_line": "2-3 sentences with the practical takeaway"
}}

Guidelines:
- SUPPORTED: Strong evidence supporting the claim
- PARTIALLY_SUPPORTED: Some evidence supports it but with important caveats/context
- NOT_SUPPORTED: Evidence contradicts the claim
- INSUFFICIENT_EVIDENCE: Studies don't directly address this claim

- Confidence HIGH: Multiple high-quality studies with consistent findings
- Confidence MODERATE: Some studies but mixed results or methodological limitations
- Confidence LOW: Very limited or indirect evidence

Be specific with numbers and cite which studies support/refute the claim. Include the 3-5 most relevant studies in key_studies.

Respond ONLY with valid JSON, no additional text."#,
        claim = claim,
        studies_text = render_studies(studies),
        count = studies.len(),
    )
}
