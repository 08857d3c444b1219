//! Candidate study retrieval by keyword

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::db::DbError;
use crate::db::filter::{CLAIM_MATCH_FIELDS, StudyFilter};
use crate::db::repository::StudyRepository;
use crate::model::Study;

/// Default number of candidate studies handed to the reasoning backend
pub const DEFAULT_CANDIDATE_LIMIT: usize = 15;

/// Read access to the study corpus
#[async_trait]
pub trait StudySource: Send + Sync {
    /// Studies matching `filter` in storage order, at most `limit` of them
    async fn find_matching(
        &self,
        filter: &StudyFilter,
        limit: usize,
    ) -> Result<Vec<Study>, DbError>;
}

#[async_trait]
impl StudySource for StudyRepository {
    async fn find_matching(
        &self,
        filter: &StudyFilter,
        limit: usize,
    ) -> Result<Vec<Study>, DbError> {
        StudyRepository::find_matching(self, filter, limit).await
    }
}

/// Find studies whose title, abstract or tag string mentions any keyword
///
/// No query is issued when `keywords` is empty.
pub async fn search_relevant_studies(
    source: &dyn StudySource,
    keywords: &BTreeSet<String>,
    limit: usize,
) -> Result<Vec<Study>, DbError> {
    if keywords.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let filter = StudyFilter::new(keywords.iter().cloned(), CLAIM_MATCH_FIELDS);
    let mut studies = source.find_matching(&filter, limit).await?;
    studies.truncate(limit);

    tracing::debug!(
        keyword_count = keywords.len(),
        candidate_count = studies.len(),
        limit = limit,
        "Retrieved candidate studies"
    );

    Ok(studies)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory study source shared by the claim pipeline tests

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;

    pub struct InMemoryStudies {
        pub studies: Vec<Study>,
        pub queries: AtomicUsize,
    }

    impl InMemoryStudies {
        pub fn new(mut studies: Vec<Study>) -> Self {
            studies.sort_by_key(|s| s.id);
            Self {
                studies,
                queries: AtomicUsize::new(0),
            }
        }

        pub fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StudySource for InMemoryStudies {
        async fn find_matching(
            &self,
            filter: &StudyFilter,
            limit: usize,
        ) -> Result<Vec<Study>, DbError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .studies
                .iter()
                .filter(|s| filter.matches(s))
                .take(limit)
                .cloned()
                .collect())
        }
    }

    pub fn study(id: i64, title: &str, abstract_text: Option<&str>) -> Study {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Study {
            id,
            title: title.to_string(),
            authors: Some("Schoenfeld BJ, Krieger J".to_string()),
            abstract_text: abstract_text.map(str::to_string),
            publication_year: Some(2019),
            journal: Some("J Strength Cond Res".to_string()),
            doi: None,
            pdf_url: None,
            keywords: None,
            created_at: ts,
            updated_at: ts,
        }
    }
}
