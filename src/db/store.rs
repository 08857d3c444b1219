//! Storage seams used by the catalogue and summary services

use async_trait::async_trait;

use super::DbError;
use super::models::{ListStudiesQuery, PaginatedStudies};
use super::repository::{BookmarkRepository, StudyRepository, SummaryRepository};
use crate::model::{Bookmark, NewBookmark, NewStudy, Study, StudyUpdate, Summary};

/// Read and write access to studies
#[async_trait]
pub trait StudyStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Study, DbError>;

    async fn get_by_doi(&self, doi: &str) -> Result<Option<Study>, DbError>;

    async fn exists(&self, id: i64) -> Result<bool, DbError>;

    /// A DOI collision is reported as [`DbError::Duplicate`]
    async fn insert(&self, study: &NewStudy) -> Result<Study, DbError>;

    async fn update(&self, id: i64, update: &StudyUpdate) -> Result<Study, DbError>;

    /// Removes the study with its bookmarks and summaries
    async fn delete(&self, id: i64) -> Result<bool, DbError>;

    async fn list(&self, query: &ListStudiesQuery) -> Result<PaginatedStudies, DbError>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn insert(&self, study_id: i64, bookmark: &NewBookmark) -> Result<Bookmark, DbError>;

    async fn list(&self, user_id: Option<&str>) -> Result<Vec<Bookmark>, DbError>;
}

#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn get_by_study(&self, study_id: i64) -> Result<Option<Summary>, DbError>;

    async fn insert(
        &self,
        study_id: i64,
        summary_text: &str,
        model_used: Option<&str>,
    ) -> Result<Summary, DbError>;
}

#[async_trait]
impl StudyStore for StudyRepository {
    async fn get_by_id(&self, id: i64) -> Result<Study, DbError> {
        StudyRepository::get_by_id(self, id).await
    }

    async fn get_by_doi(&self, doi: &str) -> Result<Option<Study>, DbError> {
        StudyRepository::get_by_doi(self, doi).await
    }

    async fn exists(&self, id: i64) -> Result<bool, DbError> {
        StudyRepository::exists(self, id).await
    }

    async fn insert(&self, study: &NewStudy) -> Result<Study, DbError> {
        StudyRepository::insert(self, study).await
    }

    async fn update(&self, id: i64, update: &StudyUpdate) -> Result<Study, DbError> {
        StudyRepository::update(self, id, update).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        StudyRepository::delete(self, id).await
    }

    async fn list(&self, query: &ListStudiesQuery) -> Result<PaginatedStudies, DbError> {
        StudyRepository::list(self, query).await
    }
}

#[async_trait]
impl BookmarkStore for BookmarkRepository {
    async fn insert(&self, study_id: i64, bookmark: &NewBookmark) -> Result<Bookmark, DbError> {
        BookmarkRepository::insert(self, study_id, bookmark).await
    }

    async fn list(&self, user_id: Option<&str>) -> Result<Vec<Bookmark>, DbError> {
        BookmarkRepository::list(self, user_id).await
    }
}

#[async_trait]
impl SummaryStore for SummaryRepository {
    async fn get_by_study(&self, study_id: i64) -> Result<Option<Summary>, DbError> {
        SummaryRepository::get_by_study(self, study_id).await
    }

    async fn insert(
        &self,
        study_id: i64,
        summary_text: &str,
        model_used: Option<&str>,
    ) -> Result<Summary, DbError> {
        SummaryRepository::insert(self, study_id, summary_text, model_used).await
    }
}
