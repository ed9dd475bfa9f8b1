//! ESummary JSON into article summaries

use tracing::warn;

use crate::error::Result;
use crate::models::ArticleSummary;
use crate::responses::{ESummaryDocSum, ESummaryResponse};

use super::parse_year;

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse an ESummary JSON response into article summaries
///
/// The order of the `uids` array in the response defines the output
/// order. Documents that are missing, carry an upstream error marker, or
/// lack mandatory fields (pmid, title) are skipped with a warning;
/// parsing only fails if the envelope itself is not valid JSON.
pub fn parse_summaries(json_text: &str) -> Result<Vec<ArticleSummary>> {
    if json_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let response: ESummaryResponse = serde_json::from_str(json_text)?;
    let result = &response.result;

    let uids = result
        .get("uids")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut summaries = Vec::with_capacity(uids.len());

    for uid in &uids {
        let Some(doc_value) = result.get(uid) else {
            warn!(uid = %uid, "UID not found in ESummary response");
            continue;
        };

        if doc_value.get("error").is_some() {
            warn!(uid = %uid, "ESummary returned error for UID");
            continue;
        }

        let doc: ESummaryDocSum = match serde_json::from_value(doc_value.clone()) {
            Ok(d) => d,
            Err(e) => {
                warn!(uid = %uid, error = %e, "Failed to parse ESummary document");
                continue;
            }
        };

        if doc.uid.trim().is_empty() || doc.title.trim().is_empty() {
            warn!(uid = %uid, "Skipping record without mandatory pmid/title");
            continue;
        }

        let authors: Vec<String> = doc.authors.iter().map(|a| a.name.clone()).collect();

        summaries.push(ArticleSummary {
            pmid: doc.uid,
            title: doc.title,
            authors,
            journal: doc.source,
            year: parse_year(&doc.pubdate),
            volume: non_empty(doc.volume),
            issue: non_empty(doc.issue),
            pages: non_empty(doc.pages),
        });
    }

    Ok(summaries)
}
