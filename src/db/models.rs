//! Database row types for studies, bookmarks and summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::model::{Bookmark, Study, Summary};

/// Database representation of a study
#[derive(Debug, Clone, FromRow)]
pub struct StudyRow {
    pub id: i64,
    pub title: String,
    pub authors: Option<String>,
    #[sqlx(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal: Option<String>,
    pub doi: Option<String>,
    pub pdf_url: Option<String>,
    pub keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudyRow> for Study {
    fn from(row: StudyRow) -> Self {
        Study {
            id: row.id,
            title: row.title,
            authors: row.authors,
            abstract_text: row.abstract_text,
            publication_year: row.publication_year,
            journal: row.journal,
            doi: row.doi,
            pdf_url: row.pdf_url,
            keywords: row.keywords,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct BookmarkRow {
    pub id: i64,
    pub study_id: i64,
    pub user_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookmarkRow> for Bookmark {
    fn from(row: BookmarkRow) -> Self {
        Bookmark {
            id: row.id,
            study_id: row.study_id,
            user_id: row.user_id,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SummaryRow {
    pub id: i64,
    pub study_id: i64,
    pub summary_text: String,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SummaryRow> for Summary {
    fn from(row: SummaryRow) -> Self {
        Summary {
            id: row.id,
            study_id: row.study_id,
            summary_text: row.summary_text,
            model_used: row.model_used,
            created_at: row.created_at,
        }
    }
}

/// Query parameters for listing studies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStudiesQuery {
    pub skip: u32,
    pub limit: u32,
    /// Case-insensitive substring matched against title, abstract, keywords and authors
    pub search: Option<String>,
}

/// A page of studies with the total number of matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedStudies {
    pub studies: Vec<Study>,
    pub total_count: i64,
}
