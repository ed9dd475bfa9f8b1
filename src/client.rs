//! Rate-limited, retried HTTP client for the NCBI E-utilities endpoints
//!
//! Three upstream operations are used: ESearch (record ID lists),
//! ESummary (summary records, JSON) and EFetch (detail records, XML).
//! Every outbound call goes through the shared [`RateLimiter`] and the
//! single-retry policy in [`crate::retry`].

use crate::config::ServiceConfig;
use crate::error::{Result, SearchError};
use crate::rate_limit::RateLimiter;
use crate::responses::ESearchResult;
use crate::retry::with_retry;
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

/// Optional publication-date window for a search (`YYYY/MM/DD`)
#[derive(Debug, Clone, Default)]
pub struct DateWindow {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

impl DateWindow {
    /// Whether neither bound is set
    pub fn is_empty(&self) -> bool {
        self.min_date.is_none() && self.max_date.is_none()
    }
}

/// Client for the upstream E-utilities service
#[derive(Clone)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ServiceConfig,
}

impl EutilsClient {
    /// Create a client with default configuration (no API key, 3 req/s)
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::new())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ServiceConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    /// The configuration this client was built from
    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The shared rate limiter gating outbound calls
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Search for record IDs matching an effective query
    ///
    /// One ESearch round trip. `page` is a zero-based offset in units of
    /// the configured page size; results are sorted by date as the
    /// service has always requested. ID order is preserved exactly as
    /// returned by upstream.
    #[instrument(skip(self, window), fields(term = %term, page = page))]
    pub async fn fetch_search_ids(
        &self,
        term: &str,
        page: usize,
        window: Option<&DateWindow>,
    ) -> Result<Vec<String>> {
        let retmax = self.config.page_size;
        let retstart = page.saturating_mul(retmax);

        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json&retmax={}&retstart={}&sort=date",
            self.base_url,
            urlencoding::encode(term),
            retmax,
            retstart
        );

        if let Some(window) = window.filter(|w| !w.is_empty()) {
            url.push_str("&datetype=pdat");
            if let Some(min_date) = &window.min_date {
                url.push_str(&format!("&mindate={}", urlencoding::encode(min_date)));
            }
            if let Some(max_date) = &window.max_date {
                url.push_str(&format!("&maxdate={}", urlencoding::encode(max_date)));
            }
        }

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let search_result: ESearchResult = response.json().await?;

        // NCBI sometimes returns 200 OK with an ERROR field in the body
        if let Some(error_msg) = &search_result.esearchresult.error {
            return Err(SearchError::UpstreamError {
                status: 200,
                message: format!("ESearch API error: {error_msg}"),
            });
        }

        Ok(search_result.esearchresult.idlist)
    }

    /// Fetch raw ESummary JSON for a batch of record IDs
    ///
    /// One ESummary round trip; the comma-joined ID list preserves the
    /// caller's ordering.
    #[instrument(skip(self), fields(pmids_count = pmids.len()))]
    pub async fn fetch_summary_records(&self, pmids: &[String]) -> Result<String> {
        if pmids.is_empty() {
            return Ok(String::new());
        }

        let url = format!(
            "{}/esummary.fcgi?db=pubmed&id={}&retmode=json",
            self.base_url,
            pmids.join(",")
        );

        debug!("Making ESummary API request");
        let response = self.make_request(&url).await?;
        Ok(response.text().await?)
    }

    /// Fetch raw EFetch XML detail records for a batch of record IDs
    #[instrument(skip(self), fields(pmids_count = pmids.len()))]
    pub async fn fetch_detail_records(&self, pmids: &[String]) -> Result<String> {
        if pmids.is_empty() {
            return Ok(String::new());
        }

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml&rettype=abstract",
            self.base_url,
            pmids.join(",")
        );

        debug!("Making EFetch API request");
        let response = self.make_request(&url).await?;
        Ok(response.text().await?)
    }

    /// Internal helper for making rate-limited HTTP requests with retry.
    /// Appends configured API parameters (api_key) to the URL.
    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        let response = with_retry(
            || async {
                self.rate_limiter.acquire().await;
                debug!("Making API request to: {}", final_url);
                let response = self
                    .client
                    .get(&final_url)
                    .send()
                    .await
                    .map_err(SearchError::from)?;

                // Convert server errors and 429s to retryable errors
                if response.status().is_server_error() || response.status().as_u16() == 429 {
                    return Err(SearchError::UpstreamError {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    });
                }

                Ok(response)
            },
            &self.config.retry,
            "E-utilities request",
        )
        .await?;

        // Any remaining non-success status (client errors etc.)
        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(SearchError::UpstreamError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for EutilsClient {
    fn default() -> Self {
        Self::new()
    }
}
