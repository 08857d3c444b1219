//! Case-insensitive substring filters over study text columns
//!
//! A filter matches a study when any of its terms is contained in any of its
//! fields. Terms are matched literally: LIKE wildcards inside a term are
//! escaped before they reach PostgreSQL.

use crate::model::Study;

/// Text column of the `studies` table that a filter can match against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyField {
    Title,
    Abstract,
    Keywords,
    Authors,
}

impl StudyField {
    pub fn column(&self) -> &'static str {
        match self {
            StudyField::Title => "title",
            StudyField::Abstract => "abstract",
            StudyField::Keywords => "keywords",
            StudyField::Authors => "authors",
        }
    }

    #[cfg(test)]
    fn value<'a>(&self, study: &'a Study) -> Option<&'a str> {
        match self {
            StudyField::Title => Some(study.title.as_str()),
            StudyField::Abstract => study.abstract_text.as_deref(),
            StudyField::Keywords => study.keywords.as_deref(),
            StudyField::Authors => study.authors.as_deref(),
        }
    }
}

/// Fields searched when matching claim keywords
pub const CLAIM_MATCH_FIELDS: &[StudyField] =
    &[StudyField::Title, StudyField::Abstract, StudyField::Keywords];

/// Fields searched by the study listing endpoint
pub const LISTING_SEARCH_FIELDS: &[StudyField] = &[
    StudyField::Title,
    StudyField::Abstract,
    StudyField::Keywords,
    StudyField::Authors,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyFilter {
    terms: Vec<String>,
    fields: &'static [StudyField],
}

impl StudyFilter {
    pub fn new<I, S>(terms: I, fields: &'static [StudyField]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
            fields,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() || self.fields.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Render as a SQL boolean expression with positional parameters
    /// starting at `$first_param`, plus the LIKE patterns to bind in order.
    ///
    /// One parameter per term is reused across all fields.
    pub fn to_sql(&self, first_param: usize) -> (String, Vec<String>) {
        let mut clauses = Vec::with_capacity(self.terms.len());
        let mut params = Vec::with_capacity(self.terms.len());

        for (i, term) in self.terms.iter().enumerate() {
            let placeholder = first_param + i;
            let per_field: Vec<String> = self
                .fields
                .iter()
                .map(|f| format!("{} ILIKE ${}", f.column(), placeholder))
                .collect();
            clauses.push(format!("({})", per_field.join(" OR ")));
            params.push(like_pattern(term));
        }

        (clauses.join(" OR "), params)
    }

    /// In-memory evaluation with the same semantics as [`StudyFilter::to_sql`]
    #[cfg(test)]
    pub fn matches(&self, study: &Study) -> bool {
        self.terms.iter().any(|term| {
            let needle = term.to_lowercase();
            self.fields.iter().any(|f| {
                f.value(study)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
    }
}

/// Build a `%term%` pattern, escaping LIKE metacharacters
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
