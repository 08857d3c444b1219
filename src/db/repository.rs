//! Repositories for study, bookmark and summary database operations

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::DbError;
use super::filter::{LISTING_SEARCH_FIELDS, StudyFilter};
use super::models::{BookmarkRow, ListStudiesQuery, PaginatedStudies, StudyRow, SummaryRow};
use crate::model::{Bookmark, NewBookmark, NewStudy, Study, StudyUpdate, Summary};

/// Repository for study operations
#[derive(Clone)]
pub struct StudyRepository {
    pool: PgPool,
}

impl StudyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a study by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Study, DbError> {
        let row: StudyRow = sqlx::query_as("SELECT * FROM studies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("study {}", id)))?;

        Ok(row.into())
    }

    pub async fn get_by_doi(&self, doi: &str) -> Result<Option<Study>, DbError> {
        let row: Option<StudyRow> = sqlx::query_as("SELECT * FROM studies WHERE doi = $1")
            .bind(doi)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Study::from))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DbError> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM studies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result.is_some())
    }

    /// Insert a new study
    ///
    /// A DOI collision surfaces as [`DbError::Duplicate`].
    pub async fn insert(&self, study: &NewStudy) -> Result<Study, DbError> {
        let row: StudyRow = sqlx::query_as(
            r#"
            INSERT INTO studies (
                title, authors, abstract, publication_year, journal, doi, pdf_url, keywords
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&study.title)
        .bind(&study.authors)
        .bind(&study.abstract_text)
        .bind(study.publication_year)
        .bind(&study.journal)
        .bind(&study.doi)
        .bind(&study.pdf_url)
        .bind(&study.keywords)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Duplicate(
                format!("doi {}", study.doi.as_deref().unwrap_or_default()),
            ),
            other => DbError::Connection(other),
        })?;

        tracing::debug!(id = row.id, "Inserted study");
        Ok(row.into())
    }

    /// Apply a partial update and bump `updated_at`
    pub async fn update(&self, id: i64, update: &StudyUpdate) -> Result<Study, DbError> {
        let mut query = update_query(id, update);
        let row: StudyRow = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("study {}", id)))?;

        tracing::debug!(id = id, "Updated study");
        Ok(row.into())
    }

    /// Delete a study by ID
    /// Returns true if the study was deleted, false if it didn't exist
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM studies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = id, "Deleted study");
        }

        Ok(deleted)
    }

    /// List studies with an optional text search
    pub async fn list(&self, query: &ListStudiesQuery) -> Result<PaginatedStudies, DbError> {
        let filter = query
            .search
            .as_deref()
            .map(|s| StudyFilter::new([s], LISTING_SEARCH_FIELDS))
            .filter(|f| !f.is_empty());

        let (where_clause, params) = match filter {
            Some(ref f) => {
                let (sql, params) = f.to_sql(1);
                (format!("WHERE {}", sql), params)
            }
            None => (String::new(), Vec::new()),
        };

        let count_query = format!("SELECT COUNT(*) FROM studies {}", where_clause);
        let total_count: i64 = {
            let mut q = sqlx::query_scalar::<_, i64>(&count_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_one(&self.pool).await?
        };

        let select_query = format!(
            "SELECT * FROM studies {} ORDER BY id LIMIT {} OFFSET {}",
            where_clause, query.limit, query.skip
        );
        let rows = {
            let mut q = sqlx::query_as::<_, StudyRow>(&select_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_all(&self.pool).await?
        };

        Ok(PaginatedStudies {
            studies: rows.into_iter().map(Study::from).collect(),
            total_count,
        })
    }

    /// Fetch studies matching a filter in id order, at most `limit` rows
    pub async fn find_matching(
        &self,
        filter: &StudyFilter,
        limit: usize,
    ) -> Result<Vec<Study>, DbError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }

        let (predicate, params) = filter.to_sql(1);
        let select_query = format!(
            "SELECT * FROM studies WHERE {} ORDER BY id LIMIT ${}",
            predicate,
            params.len() + 1
        );

        let mut q = sqlx::query_as::<_, StudyRow>(&select_query);
        for param in &params {
            q = q.bind(param);
        }
        let rows = q
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Study::from).collect())
    }
}

/// Build the `UPDATE` for the fields present in `update`
///
/// `Some(None)` binds NULL, clearing the column.
fn update_query(id: i64, update: &StudyUpdate) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE studies SET ");
    {
        let mut set = query.separated(", ");
        if let Some(title) = &update.title {
            set.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(authors) = &update.authors {
            set.push("authors = ").push_bind_unseparated(authors.clone());
        }
        if let Some(abstract_text) = &update.abstract_text {
            set.push("abstract = ")
                .push_bind_unseparated(abstract_text.clone());
        }
        if let Some(year) = update.publication_year {
            set.push("publication_year = ").push_bind_unseparated(year);
        }
        if let Some(journal) = &update.journal {
            set.push("journal = ").push_bind_unseparated(journal.clone());
        }
        if let Some(pdf_url) = &update.pdf_url {
            set.push("pdf_url = ").push_bind_unseparated(pdf_url.clone());
        }
        if let Some(keywords) = &update.keywords {
            set.push("keywords = ").push_bind_unseparated(keywords.clone());
        }
        set.push("updated_at = NOW()");
    }
    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    query
}

/// Repository for bookmark operations
#[derive(Clone)]
pub struct BookmarkRepository {
    pool: PgPool,
}

impl BookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, study_id: i64, bookmark: &NewBookmark) -> Result<Bookmark, DbError> {
        let row: BookmarkRow = sqlx::query_as(
            r#"
            INSERT INTO bookmarks (study_id, user_id, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(study_id)
        .bind(&bookmark.user_id)
        .bind(&bookmark.notes)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = row.id, study_id = study_id, "Inserted bookmark");
        Ok(row.into())
    }

    /// List bookmarks, optionally restricted to one user
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Bookmark>, DbError> {
        let rows: Vec<BookmarkRow> = match user_id {
            Some(user) => {
                sqlx::query_as("SELECT * FROM bookmarks WHERE user_id = $1 ORDER BY id")
                    .bind(user)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM bookmarks ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Bookmark::from).collect())
    }
}

/// Repository for study summary operations
#[derive(Clone)]
pub struct SummaryRepository {
    pool: PgPool,
}

impl SummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the stored summary for a study, oldest first if several exist
    pub async fn get_by_study(&self, study_id: i64) -> Result<Option<Summary>, DbError> {
        let row: Option<SummaryRow> =
            sqlx::query_as("SELECT * FROM summaries WHERE study_id = $1 ORDER BY id LIMIT 1")
                .bind(study_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Summary::from))
    }

    pub async fn insert(
        &self,
        study_id: i64,
        summary_text: &str,
        model_used: Option<&str>,
    ) -> Result<Summary, DbError> {
        let row: SummaryRow = sqlx::query_as(
            r#"
            INSERT INTO summaries (study_id, summary_text, model_used)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(study_id)
        .bind(summary_text)
        .bind(model_used)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = row.id, study_id = study_id, "Inserted summary");
        Ok(row.into())
    }
}
