//! Transformation of raw upstream payloads into output shapes
//!
//! Three transformations, all order-preserving:
//!
//! - `esummary` - ESummary JSON into [`ArticleSummary`] lists
//! - `efetch` - EFetch XML detail records (the guideline path) into the
//!   same [`ArticleSummary`] shape
//! - `citation` - [`ArticleSummary`] lists into AMA-style [`Citation`]s
//!
//! Records missing mandatory fields (pmid, title) are skipped with a
//! warning; a bad record never aborts its batch.

mod citation;
mod efetch;
mod esummary;

pub use citation::{format_ama_citation, to_citations};
pub use efetch::parse_guideline_summaries;
pub use esummary::parse_summaries;

/// Extract a four-digit publication year from an upstream date string
/// such as `"2020 Feb"`, `"2020"`, or `"2019 Nov-Dec"`.
pub(crate) fn parse_year(date: &str) -> Option<i32> {
    date.split(|c: char| !c.is_ascii_digit())
        .find(|token| token.len() == 4)
        .and_then(|token| token.parse().ok())
}
