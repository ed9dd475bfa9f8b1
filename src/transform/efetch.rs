//! EFetch XML detail records into article summaries
//!
//! The guideline search fetches full detail records via EFetch rather
//! than ESummary, so free-full-text-linked guideline results flow through
//! this parser. Only summary-level fields are extracted.

use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::warn;

use crate::error::{Result, SearchError};
use crate::models::ArticleSummary;

use super::parse_year;

#[derive(Debug, Deserialize)]
struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    articles: Vec<PubmedArticleXml>,
}

#[derive(Debug, Deserialize)]
struct PubmedArticleXml {
    #[serde(rename = "MedlineCitation")]
    medline_citation: Option<MedlineCitationXml>,
}

#[derive(Debug, Deserialize)]
struct MedlineCitationXml {
    #[serde(rename = "PMID")]
    pmid: Option<PmidXml>,
    #[serde(rename = "Article")]
    article: Option<ArticleXml>,
}

/// PMID elements carry a Version attribute alongside the text node
#[derive(Debug, Deserialize)]
struct PmidXml {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ArticleXml {
    #[serde(rename = "ArticleTitle")]
    title: Option<String>,
    #[serde(rename = "Journal")]
    journal: Option<JournalXml>,
    #[serde(rename = "AuthorList")]
    author_list: Option<AuthorListXml>,
    #[serde(rename = "Pagination")]
    pagination: Option<PaginationXml>,
}

#[derive(Debug, Deserialize)]
struct JournalXml {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "ISOAbbreviation")]
    iso_abbreviation: Option<String>,
    #[serde(rename = "JournalIssue")]
    journal_issue: Option<JournalIssueXml>,
}

#[derive(Debug, Deserialize)]
struct JournalIssueXml {
    #[serde(rename = "Volume")]
    volume: Option<String>,
    #[serde(rename = "Issue")]
    issue: Option<String>,
    #[serde(rename = "PubDate")]
    pub_date: Option<PubDateXml>,
}

#[derive(Debug, Deserialize)]
struct PubDateXml {
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "MedlineDate")]
    medline_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorListXml {
    #[serde(rename = "Author", default)]
    authors: Vec<AuthorXml>,
}

#[derive(Debug, Deserialize)]
struct AuthorXml {
    #[serde(rename = "LastName")]
    last_name: Option<String>,
    #[serde(rename = "Initials")]
    initials: Option<String>,
    #[serde(rename = "ForeName")]
    fore_name: Option<String>,
    #[serde(rename = "CollectiveName")]
    collective_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaginationXml {
    #[serde(rename = "MedlinePgn")]
    medline_pgn: Option<String>,
}

impl AuthorXml {
    /// MEDLINE citation name form: "LastName Initials", falling back to
    /// ForeName or a collective (group) name.
    fn display_name(&self) -> Option<String> {
        if let Some(last) = &self.last_name {
            let name = match self.initials.as_deref().or(self.fore_name.as_deref()) {
                Some(given) => format!("{} {}", last.trim(), given.trim()),
                None => last.trim().to_string(),
            };
            return Some(name);
        }
        self.collective_name
            .as_ref()
            .map(|name| name.trim().to_string())
    }
}

/// Inline formatting tags that appear inside titles and abstracts and
/// confuse element-level deserialization.
const INLINE_TAGS: [&str; 10] = [
    "<i>", "</i>", "<b>", "</b>", "<sup>", "</sup>", "<sub>", "</sub>", "<u>", "</u>",
];

fn strip_inline_html_tags(xml: &str) -> String {
    let mut cleaned = xml.to_string();
    for tag in INLINE_TAGS {
        if cleaned.contains(tag) {
            cleaned = cleaned.replace(tag, "");
        }
    }
    cleaned
}

/// Parse an EFetch XML response into article summaries
///
/// Document order in the XML defines the output order. Records without a
/// PMID or title are skipped with a warning; parsing only fails if the
/// document set itself cannot be deserialized.
pub fn parse_guideline_summaries(xml_text: &str) -> Result<Vec<ArticleSummary>> {
    if xml_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let cleaned = strip_inline_html_tags(xml_text);
    let article_set: PubmedArticleSet = from_str(&cleaned)
        .map_err(|e| SearchError::XmlError(format!("failed to deserialize EFetch XML: {e}")))?;

    let mut summaries = Vec::with_capacity(article_set.articles.len());

    for article_xml in article_set.articles {
        match summarize_article(article_xml) {
            Some(summary) => summaries.push(summary),
            None => warn!("Skipping EFetch record without mandatory pmid/title"),
        }
    }

    Ok(summaries)
}

fn summarize_article(article_xml: PubmedArticleXml) -> Option<ArticleSummary> {
    let citation = article_xml.medline_citation?;

    let pmid = citation.pmid.map(|p| p.value.trim().to_string())?;
    if pmid.is_empty() {
        return None;
    }

    let article = citation.article?;
    let title = article.title.map(|t| t.trim().to_string())?;
    if title.is_empty() {
        return None;
    }

    let authors = article
        .author_list
        .map(|list| {
            list.authors
                .iter()
                .filter_map(AuthorXml::display_name)
                .collect()
        })
        .unwrap_or_default();

    let (journal, journal_issue) = match article.journal {
        Some(journal) => {
            let name = journal
                .iso_abbreviation
                .or(journal.title)
                .unwrap_or_default();
            (name, journal.journal_issue)
        }
        None => (String::new(), None),
    };

    let (volume, issue, year) = match journal_issue {
        Some(journal_issue) => {
            let year = journal_issue.pub_date.and_then(|d| {
                d.year
                    .as_deref()
                    .or(d.medline_date.as_deref())
                    .and_then(parse_year)
            });
            (journal_issue.volume, journal_issue.issue, year)
        }
        None => (None, None, None),
    };

    let pages = article.pagination.and_then(|p| p.medline_pgn);

    Some(ArticleSummary {
        pmid,
        title,
        authors,
        journal,
        year,
        volume,
        issue,
        pages,
    })
}
