//! Field tags and fixed filter clauses for PubMed queries

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SearchError};

/// Publication-type clause used by the guideline search
pub const GUIDELINE_PUBLICATION_FILTER: &str =
    r#"("guideline"[Publication Type] OR "practice guideline"[Publication Type])"#;

/// Free-full-text availability clause used by the guideline search
pub const FREE_FULL_TEXT_FILTER: &str = r#""free full text"[Filter]"#;

/// Bibliographic field a search term can be scoped to
///
/// A closed enumeration: the `search_field` surface accepts exactly these
/// values, and each maps to one bracketed tag in the upstream query
/// grammar. Unrecognized field names are rejected as `InvalidQuery`
/// before any upstream call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Author,
    Journal,
    Title,
    TitleAbstract,
    MeshTerms,
    PublicationType,
}

impl SearchField {
    /// Parse the API surface value (e.g. `"MeSH Terms"`) into a field tag
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "Author" => Ok(SearchField::Author),
            "Journal" => Ok(SearchField::Journal),
            "Title" => Ok(SearchField::Title),
            "Title/Abstract" => Ok(SearchField::TitleAbstract),
            "MeSH Terms" => Ok(SearchField::MeshTerms),
            "Publication Type" => Ok(SearchField::PublicationType),
            other => Err(SearchError::InvalidQuery(format!(
                "unrecognized search field: {other:?}"
            ))),
        }
    }

    /// The bracketed tag appended to the term it qualifies
    pub fn as_tag(&self) -> &'static str {
        match self {
            SearchField::Author => "[Author]",
            SearchField::Journal => "[Journal]",
            SearchField::Title => "[Title]",
            SearchField::TitleAbstract => "[Title/Abstract]",
            SearchField::MeshTerms => "[MeSH Terms]",
            SearchField::PublicationType => "[Publication Type]",
        }
    }
}

impl FromStr for SearchField {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        SearchField::parse(s)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
