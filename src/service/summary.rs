//! Study summary generation
//!
//! Produces an in-depth written analysis of a single study with the
//! reasoning backend and stores it so each study is summarized once.

use std::sync::Arc;

use crate::db::DbError;
use crate::db::store::{StudyStore, SummaryStore};
use crate::model::{Study, Summary};
use crate::service::llm::ReasoningBackend;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("Study not found")]
    StudyNotFound(i64),

    #[error("Summary not found")]
    SummaryNotFound(i64),

    #[error("Failed to generate summary: {0}")]
    Generation(String),

    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

/// Build the analysis prompt for a study
pub fn build_summary_prompt(study: &Study) -> String {
    format!(
        r#"You are an expert exercise scientist and research analyst. Provide a comprehensive, in-depth analysis of this research study for fitness professionals, coaches, and serious athletes.

Study Details:
Title: {title}
Authors: {authors}
Abstract: {abstract_text}

Create a detailed analysis covering:

## Study Overview
- Research question and hypothesis
- Study design and methodology
- Participant characteristics (sample size, demographics, training status)

## Key Findings
- Primary outcomes with specific numbers and effect sizes
- Secondary findings
- Statistical significance and practical significance
- How results compare to previous research

## Practical Applications
- Specific training recommendations with sets, reps, frequency
- Who this applies to (beginners, intermediate, advanced)
- How to implement these findings in real programs
- Potential modifications for different goals

## Mechanisms and Theory
- Biological/physiological mechanisms behind the results
- Why these results occurred
- Theoretical implications for hypertrophy

## Study Limitations
- Sample size and statistical power
- Specific population limitations
- Methodological constraints
- External validity concerns
- What we still don't know

## Critical Analysis
- Strengths of the study design
- Weaknesses or potential confounds
- How confident should we be in these results
- Conflicts with other research (if applicable)

## Bottom Line
- Single most important takeaway
- Confidence level in recommendations (high/moderate/low)
- Who should care about this research

Be specific with numbers, percentages, and measurements. Write in clear, accessible language while maintaining scientific accuracy. Aim for depth over brevity."#,
        title = study.title,
        authors = study.authors.as_deref().unwrap_or_default(),
        abstract_text = study.abstract_text.as_deref().unwrap_or_default(),
    )
}

/// Service for generating and serving study summaries
pub struct SummaryService {
    studies: Arc<dyn StudyStore>,
    summaries: Arc<dyn SummaryStore>,
    backend: Arc<dyn ReasoningBackend>,
    max_tokens: u32,
}

impl SummaryService {
    pub fn new(
        studies: Arc<dyn StudyStore>,
        summaries: Arc<dyn SummaryStore>,
        backend: Arc<dyn ReasoningBackend>,
        max_tokens: u32,
    ) -> Self {
        tracing::info!(max_tokens = max_tokens, "Summary service initialized");
        Self {
            studies,
            summaries,
            backend,
            max_tokens,
        }
    }

    /// Return the stored summary for a study, generating it on first request
    pub async fn create_summary(&self, study_id: i64) -> Result<Summary, SummaryError> {
        let study = self.studies.get_by_id(study_id).await.map_err(|e| match e {
            DbError::NotFound(_) => SummaryError::StudyNotFound(study_id),
            other => SummaryError::DbError(other),
        })?;

        if let Some(existing) = self.summaries.get_by_study(study_id).await? {
            tracing::debug!(study_id = study_id, "Returning stored summary");
            return Ok(existing);
        }

        let prompt = build_summary_prompt(&study);
        let start_time = std::time::Instant::now();

        let completion = match self.backend.complete(&prompt, self.max_tokens).await {
            Ok(completion) => {
                tracing::info!(
                    study_id = study_id,
                    model = %completion.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    summary_length = completion.text.len(),
                    "Reasoning backend call for study summary completed"
                );
                completion
            }
            Err(e) => {
                tracing::error!(
                    study_id = study_id,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Reasoning backend call for study summary failed"
                );
                return Err(SummaryError::Generation(e.to_string()));
            }
        };

        let summary = self
            .summaries
            .insert(study_id, &completion.text, Some(&completion.model))
            .await?;

        Ok(summary)
    }

    pub async fn get_summary(&self, study_id: i64) -> Result<Summary, SummaryError> {
        self.summaries
            .get_by_study(study_id)
            .await?
            .ok_or(SummaryError::SummaryNotFound(study_id))
    }
}
