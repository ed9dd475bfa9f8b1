//! Raw E-utilities response structures
//!
//! JSON wire types for ESearch and ESummary. EFetch XML types live with
//! the XML transformer in [`crate::transform`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub retmax: Option<String>,
    #[serde(default)]
    pub retstart: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
}

/// ESummary returns a JSON object with "result" containing a "uids" array
/// and per-UID objects. We use serde_json::Value to handle the dynamic
/// per-UID keys, then parse each document individually.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryResponse {
    pub result: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryAuthor {
    pub name: String,
    #[serde(default)]
    pub authtype: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryDocSum {
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub authors: Vec<ESummaryAuthor>,
    #[serde(default)]
    pub pubdate: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub pages: String,
}
