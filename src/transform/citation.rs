//! AMA-style citation formatting
//!
//! Format: `Author(s). Title. *Journal*. Year;Volume(Issue):Pages.` with
//! every missing optional part omitted rather than rendered as a
//! placeholder.

use crate::models::{ArticleSummary, Citation};

/// Format a single summary as an AMA-style citation string
///
/// When more than `max_authors` authors exist, the first `max_authors`
/// are kept and an "et al" marker is appended. Deterministic for a given
/// `max_authors`.
pub fn format_ama_citation(summary: &ArticleSummary, max_authors: usize) -> String {
    let max_authors = max_authors.max(1);

    let mut authors = if summary.authors.is_empty() {
        String::new()
    } else if summary.authors.len() > max_authors {
        let mut joined = summary.authors[..max_authors].join(", ");
        joined.push_str(", et al");
        joined
    } else {
        summary.authors.join(", ")
    };
    if !authors.is_empty() && !authors.ends_with('.') {
        authors.push('.');
    }

    // Title: drop stray markdown emphasis and end with a period
    let mut title = summary.title.replace('*', "").trim().to_string();
    if !title.is_empty() && !title.ends_with('.') {
        title.push('.');
    }

    let journal = if summary.journal.trim().is_empty() {
        String::new()
    } else {
        format!("*{}*.", summary.journal.trim())
    };

    let year = summary
        .year
        .map(|y| format!("{y};"))
        .unwrap_or_default();

    // Volume(Issue):Pages.
    let mut details = String::new();
    if let Some(volume) = &summary.volume {
        details.push_str(volume);
    }
    if let Some(issue) = &summary.issue {
        details.push_str(&format!("({issue})"));
    }
    if let Some(pages) = &summary.pages {
        details.push_str(&format!(":{pages}"));
    }
    if !details.is_empty() {
        details.push('.');
    }

    [authors, title, journal, year, details]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map summaries into citations with canonical PubMed links, preserving order
pub fn to_citations(summaries: &[ArticleSummary], max_authors: usize) -> Vec<Citation> {
    summaries
        .iter()
        .map(|summary| Citation {
            citation: format_ama_citation(summary, max_authors),
            link: summary.link(),
        })
        .collect()
}
