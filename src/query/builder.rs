//! Builder for the effective query string sent upstream

use crate::error::{Result, SearchError};

use super::fields::{SearchField, FREE_FULL_TEXT_FILTER, GUIDELINE_PUBLICATION_FILTER};

/// Builder for a PubMed search query
///
/// Produces the fully resolved query string the E-utilities ESearch
/// endpoint expects. Construction is deterministic: the same text, field
/// tag and filters always serialize to the identical string, which the
/// cache key derivation depends on.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    text: String,
    field: Option<SearchField>,
    filters: Vec<String>,
}

impl SearchQuery {
    /// Create a query for the given free-text terms
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            field: None,
            filters: Vec::new(),
        }
    }

    /// Scope the search text to a bibliographic field
    pub fn field(mut self, field: SearchField) -> Self {
        self.field = Some(field);
        self
    }

    /// Scope the search text to an optional field, when one was supplied
    pub fn field_opt(mut self, field: Option<SearchField>) -> Self {
        self.field = field;
        self
    }

    /// Append an extra AND clause
    ///
    /// Filters serialize in insertion order, so callers composing fixed
    /// filter sets must add them in a fixed order.
    pub fn filter<S: Into<String>>(mut self, clause: S) -> Self {
        self.filters.push(clause.into());
        self
    }

    /// Restrict to clinical guidelines with free full text available
    ///
    /// Appends the publication-type clause and then the free-full-text
    /// clause, in that order, matching the upstream query the service has
    /// always issued.
    pub fn guidelines(self) -> Self {
        self.filter(GUIDELINE_PUBLICATION_FILTER)
            .filter(FREE_FULL_TEXT_FILTER)
    }

    /// Build the effective query string
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the search text is empty after trimming.
    pub fn build(&self) -> Result<String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(SearchError::InvalidQuery(
                "search text must not be empty".to_string(),
            ));
        }

        // The term is parenthesized whenever a tag or extra clauses follow,
        // so the tag scopes only the term and the AND clauses bind cleanly.
        let term = match self.field {
            Some(field) => format!("({}){}", text, field.as_tag()),
            None if !self.filters.is_empty() => format!("({text})"),
            None => text.to_string(),
        };

        let mut parts = vec![term];
        parts.extend(self.filters.iter().cloned());

        Ok(parts.join(" AND "))
    }
}
