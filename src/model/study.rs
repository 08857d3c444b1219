use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A published study as stored in the research corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Study {
    pub id: i64,
    pub title: String,
    pub authors: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal: Option<String>,
    /// Unique across the corpus when present
    pub doi: Option<String>,
    pub pdf_url: Option<String>,
    /// Free-text tag string (comma separated in practice)
    pub keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for depositing a new study
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewStudy {
    pub title: String,
    pub authors: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_year: Option<i32>,
    pub journal: Option<String>,
    pub doi: Option<String>,
    pub pdf_url: Option<String>,
    pub keywords: Option<String>,
}

/// Partial update of a study
///
/// Absent fields are left untouched. An explicit `null` clears a nullable
/// field. `title` cannot be cleared and the DOI cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub authors: Option<Option<String>>,
    #[serde(
        rename = "abstract",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub abstract_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub journal: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub pdf_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub keywords: Option<Option<String>>,
}

impl StudyUpdate {
    /// In-memory counterpart of the repository `UPDATE`
    #[cfg(test)]
    pub fn apply(&self, study: &mut Study) {
        if let Some(title) = &self.title {
            study.title = title.clone();
        }
        if let Some(authors) = &self.authors {
            study.authors = authors.clone();
        }
        if let Some(abstract_text) = &self.abstract_text {
            study.abstract_text = abstract_text.clone();
        }
        if let Some(year) = self.publication_year {
            study.publication_year = year;
        }
        if let Some(journal) = &self.journal {
            study.journal = journal.clone();
        }
        if let Some(pdf_url) = &self.pdf_url {
            study.pdf_url = pdf_url.clone();
        }
        if let Some(keywords) = &self.keywords {
            study.keywords = keywords.clone();
        }
    }
}

/// Present-but-null becomes `Some(None)`; `#[serde(default)]` covers absent
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bookmark {
    pub id: i64,
    pub study_id: i64,
    pub user_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewBookmark {
    pub user_id: Option<String>,
    pub notes: Option<String>,
}

/// LLM-generated analysis of a single study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub id: i64,
    pub study_id: i64,
    pub summary_text: String,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for generating a study summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryRequest {
    pub study_id: i64,
}

/// One page of studies plus the total number of matches
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudyListResponse {
    pub total: i64,
    pub studies: Vec<Study>,
    pub page: u32,
    pub page_size: u32,
}
