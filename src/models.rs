//! Output shapes returned by the search service
//!
//! These are derived values, regenerated per response and serialized both
//! into cache entries and API bodies.

use serde::{Deserialize, Serialize};

/// Base URL for article links on pubmed.ncbi.nlm.nih.gov
pub const PUBMED_ARTICLE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// A brief bibliographic summary of an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// PubMed ID
    pub pmid: String,
    /// Article title
    pub title: String,
    /// Author names in citation order
    pub authors: Vec<String>,
    /// Journal name (MEDLINE abbreviation)
    pub journal: String,
    /// Publication year, when upstream provides one
    pub year: Option<i32>,
    /// Journal volume
    pub volume: Option<String>,
    /// Journal issue
    pub issue: Option<String>,
    /// Page range
    pub pages: Option<String>,
}

impl ArticleSummary {
    /// Canonical PubMed link for this article
    pub fn link(&self) -> String {
        format!("{}/{}/", PUBMED_ARTICLE_URL, self.pmid)
    }
}

/// A formatted citation with a link back to the article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// AMA-style citation string
    pub citation: String,
    /// Canonical PubMed article URL
    pub link: String,
}
