//! Study catalogue service: studies and bookmarks

use std::sync::Arc;

use crate::db::DbError;
use crate::db::models::ListStudiesQuery;
use crate::db::store::{BookmarkStore, StudyStore};
use crate::model::{Bookmark, NewBookmark, NewStudy, Study, StudyListResponse, StudyUpdate};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StudyServiceError {
    #[error("Study not found")]
    NotFound(i64),

    #[error("Study with this DOI already exists")]
    DuplicateDoi(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Database error: {0}")]
    DbError(DbError),
}

impl From<DbError> for StudyServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(doi) => StudyServiceError::DuplicateDoi(doi),
            other => StudyServiceError::DbError(other),
        }
    }
}

/// Page position for a skip/limit pair (1-based)
pub fn page_number(skip: u32, limit: u32) -> u32 {
    skip / limit.max(1) + 1
}

/// Check listing bounds: `limit` in `1..=100`
pub fn validate_list_query(
    skip: Option<u32>,
    limit: Option<u32>,
) -> Result<(u32, u32), StudyServiceError> {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(StudyServiceError::InvalidQuery(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok((skip, limit))
}

/// Service for managing studies and bookmarks
pub struct StudyService {
    studies: Arc<dyn StudyStore>,
    bookmarks: Arc<dyn BookmarkStore>,
}

impl StudyService {
    pub fn new(studies: Arc<dyn StudyStore>, bookmarks: Arc<dyn BookmarkStore>) -> Self {
        Self { studies, bookmarks }
    }

    /// List studies with pagination and an optional search term
    pub async fn list(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> Result<StudyListResponse, StudyServiceError> {
        let (skip, limit) = validate_list_query(skip, limit)?;
        let search = search.filter(|s| !s.trim().is_empty());

        let page = self
            .studies
            .list(&ListStudiesQuery {
                skip,
                limit,
                search,
            })
            .await?;

        Ok(StudyListResponse {
            total: page.total_count,
            studies: page.studies,
            page: page_number(skip, limit),
            page_size: limit,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Study, StudyServiceError> {
        self.studies.get_by_id(id).await.map_err(|e| match e {
            DbError::NotFound(_) => StudyServiceError::NotFound(id),
            other => other.into(),
        })
    }

    /// Create a study, refusing a DOI that is already in the corpus
    pub async fn create(&self, study: NewStudy) -> Result<Study, StudyServiceError> {
        if let Some(doi) = study.doi.as_deref()
            && self.studies.get_by_doi(doi).await?.is_some()
        {
            return Err(StudyServiceError::DuplicateDoi(doi.to_string()));
        }

        let created = self.studies.insert(&study).await?;
        tracing::info!(id = created.id, doi = ?created.doi, "Study created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, update: StudyUpdate) -> Result<Study, StudyServiceError> {
        self.studies.update(id, &update).await.map_err(|e| match e {
            DbError::NotFound(_) => StudyServiceError::NotFound(id),
            other => other.into(),
        })
    }

    pub async fn delete(&self, id: i64) -> Result<(), StudyServiceError> {
        if self.studies.delete(id).await? {
            tracing::info!(id = id, "Study deleted");
            Ok(())
        } else {
            Err(StudyServiceError::NotFound(id))
        }
    }

    /// Bookmark an existing study
    pub async fn bookmark(
        &self,
        study_id: i64,
        bookmark: NewBookmark,
    ) -> Result<Bookmark, StudyServiceError> {
        if !self.studies.exists(study_id).await? {
            return Err(StudyServiceError::NotFound(study_id));
        }
        Ok(self.bookmarks.insert(study_id, &bookmark).await?)
    }

    pub async fn list_bookmarks(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<Bookmark>, StudyServiceError> {
        Ok(self.bookmarks.list(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::testing::MemoryStore;
    use crate::service::claims::retrieval::testing::study;

    const DOI: &str = "10.1519/JSC.0000000000001764";

    fn store() -> Arc<MemoryStore> {
        let mut volume = study(1, "Resistance training volume and hypertrophy", None);
        volume.doi = Some(DOI.to_string());
        Arc::new(MemoryStore::new(vec![
            volume,
            study(2, "Protein timing in older adults", Some("Leucine threshold")),
            study(3, "Rest intervals between sets", None),
        ]))
    }

    fn service(store: &Arc<MemoryStore>) -> StudyService {
        StudyService::new(store.clone(), store.clone())
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(0, 20), 1);
        assert_eq!(page_number(19, 20), 1);
        assert_eq!(page_number(20, 20), 2);
        assert_eq!(page_number(45, 20), 3);
    }

    #[test]
    fn test_list_query_defaults() {
        assert_eq!(validate_list_query(None, None).unwrap(), (0, 20));
        assert_eq!(validate_list_query(Some(40), Some(100)).unwrap(), (40, 100));
    }

    #[test]
    fn test_list_query_bounds() {
        assert!(matches!(
            validate_list_query(None, Some(0)),
            Err(StudyServiceError::InvalidQuery(_))
        ));
        assert!(matches!(
            validate_list_query(None, Some(101)),
            Err(StudyServiceError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_duplicate_db_error_maps_to_duplicate_doi() {
        let err: StudyServiceError = DbError::Duplicate("doi 10.1/abc".to_string()).into();
        assert!(matches!(err, StudyServiceError::DuplicateDoi(_)));
        assert_eq!(err.to_string(), "Study with this DOI already exists");
    }

    #[tokio::test]
    async fn test_list_pages_and_search() {
        let store = store();
        let service = service(&store);

        let page = service.list(Some(2), Some(2), None).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
        assert_eq!(page.studies.len(), 1);
        assert_eq!(page.studies[0].id, 3);

        let page = service
            .list(None, None, Some("LEUCINE".to_string()))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.studies[0].id, 2);

        // Blank search lists everything
        let page = service.list(None, None, Some("  ".to_string())).await.unwrap();
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_doi() {
        let store = store();
        let service = service(&store);

        let result = service
            .create(NewStudy {
                title: "Same paper, resubmitted".to_string(),
                doi: Some(DOI.to_string()),
                ..NewStudy::default()
            })
            .await;

        assert!(matches!(result, Err(StudyServiceError::DuplicateDoi(_))));
        assert_eq!(store.studies().len(), 3);
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = store();
        let service = service(&store);

        let created = service
            .create(NewStudy {
                title: "Blood flow restriction training".to_string(),
                doi: Some("10.1007/s40279-019-01200-z".to_string()),
                ..NewStudy::default()
            })
            .await
            .unwrap();

        assert_eq!(created.id, 4);
        assert_eq!(service.get(4).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_get_missing_study() {
        let store = store();
        let result = service(&store).get(99).await;
        assert!(matches!(result, Err(StudyServiceError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_update_clears_null_fields_only() {
        let store = store();
        let service = service(&store);

        let update: StudyUpdate =
            serde_json::from_str(r#"{"authors": null, "journal": "Sports Med"}"#).unwrap();
        let updated = service.update(1, update).await.unwrap();

        assert_eq!(updated.authors, None);
        assert_eq!(updated.journal.as_deref(), Some("Sports Med"));
        assert_eq!(updated.title, "Resistance training volume and hypertrophy");
        assert_eq!(updated.publication_year, Some(2019));
        assert_eq!(updated.doi.as_deref(), Some(DOI));

        let missing = service.update(99, StudyUpdate::default()).await;
        assert!(matches!(missing, Err(StudyServiceError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_missing_study() {
        let store = store();
        let service = service(&store);

        let result = service.delete(99).await;

        assert!(matches!(result, Err(StudyServiceError::NotFound(99))));
        assert_eq!(store.studies().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_bookmarks() {
        let store = store();
        let service = service(&store);

        service
            .bookmark(2, NewBookmark::default())
            .await
            .unwrap();
        service.delete(2).await.unwrap();

        assert!(store.studies().iter().all(|s| s.id != 2));
        assert!(store.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_bookmark_missing_study() {
        let store = store();
        let service = service(&store);

        let result = service.bookmark(99, NewBookmark::default()).await;

        assert!(matches!(result, Err(StudyServiceError::NotFound(99))));
        assert!(store.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_bookmarks_filtered_by_user() {
        let store = store();
        let service = service(&store);

        for (study_id, user) in [(1, "coach"), (2, "athlete"), (3, "coach")] {
            service
                .bookmark(
                    study_id,
                    NewBookmark {
                        user_id: Some(user.to_string()),
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }

        let coach = service.list_bookmarks(Some("coach")).await.unwrap();
        let ids: Vec<i64> = coach.iter().map(|b| b.study_id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(service.list_bookmarks(None).await.unwrap().len(), 3);
    }
}
