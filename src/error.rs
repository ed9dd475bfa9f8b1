use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Error types for PubMed search operations
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Malformed or empty input query, or unrecognized field tag
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Upstream E-utilities service returned a failure status or an
    /// unusable payload
    #[error("Upstream error {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// An individual result record lacked mandatory fields.
    ///
    /// Handled locally by skipping the record; never surfaced as a
    /// request-level failure.
    #[error("Malformed record (pmid: {pmid}): {reason}")]
    MalformedRecord { pmid: String, reason: String },

    /// Cache backend unreachable.
    ///
    /// Absorbed by the orchestrator: every `get` becomes a miss, every
    /// `insert` a no-op.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),
}

pub type Result<T> = result::Result<T, SearchError>;

impl SearchError {
    /// Machine-readable error kind, suitable for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidQuery(_) => "invalid_query",
            SearchError::UpstreamError { .. } => "upstream_error",
            SearchError::MalformedRecord { .. } => "malformed_record",
            SearchError::CacheUnavailable(_) => "cache_unavailable",
            SearchError::RequestError(_) | SearchError::JsonError(_) | SearchError::XmlError(_) => {
                "upstream_error"
            }
        }
    }

    /// Fold internal transport/parse failures into the public taxonomy.
    ///
    /// Only `InvalidQuery` and `UpstreamError` reach callers; everything
    /// else that escapes this far becomes an `UpstreamError` with the
    /// status preserved where possible.
    pub(crate) fn into_public(self) -> SearchError {
        match self {
            SearchError::InvalidQuery(_) | SearchError::UpstreamError { .. } => self,
            SearchError::RequestError(err) => {
                let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
                SearchError::UpstreamError {
                    status,
                    message: err.to_string(),
                }
            }
            SearchError::JsonError(err) => SearchError::UpstreamError {
                status: 0,
                message: format!("malformed upstream JSON: {err}"),
            },
            SearchError::XmlError(message) => SearchError::UpstreamError {
                status: 0,
                message: format!("malformed upstream XML: {message}"),
            },
            other => SearchError::UpstreamError {
                status: 0,
                message: other.to_string(),
            },
        }
    }
}

impl RetryableError for SearchError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            SearchError::RequestError(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                // Server errors (5xx) and rate limiting (429)
                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                // DNS and other network errors
                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }

            SearchError::UpstreamError { status, .. } => {
                (*status >= 500 && *status < 600) || *status == 429
            }

            // All other errors are not retryable
            SearchError::JsonError(_)
            | SearchError::XmlError(_)
            | SearchError::InvalidQuery(_)
            | SearchError::MalformedRecord { .. }
            | SearchError::CacheUnavailable(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                SearchError::RequestError(err) if err.is_timeout() => "Request timeout",
                SearchError::RequestError(err) if err.is_connect() => "Connection error",
                SearchError::RequestError(_) => "Network error",
                SearchError::UpstreamError { status, .. } => match status {
                    429 => "Rate limit exceeded",
                    500..=599 => "Server error",
                    _ => "Temporary upstream error",
                },
                _ => "Transient error",
            }
        } else {
            match self {
                SearchError::JsonError(_) => "Invalid JSON response",
                SearchError::XmlError(_) => "Invalid XML response",
                SearchError::InvalidQuery(_) => "Invalid query",
                SearchError::MalformedRecord { .. } => "Malformed record",
                SearchError::CacheUnavailable(_) => "Cache backend error",
                _ => "Non-transient error",
            }
        }
    }
}
