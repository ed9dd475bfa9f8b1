//! Service configuration
//!
//! All externally supplied knobs live here: the optional NCBI API key
//! (which determines the rate ceiling), the E-utilities base URL, cache
//! sizing and TTL, pagination, retry policy and citation formatting.

use std::time::Duration;

use crate::cache::CacheConfig;
use crate::rate_limit::RateLimiter;
use crate::retry::RetryConfig;

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// NCBI rate ceiling without an API key (requests/second)
const RATE_LIMIT_DEFAULT: f64 = 3.0;
/// NCBI rate ceiling with an API key (requests/second)
const RATE_LIMIT_WITH_KEY: f64 = 10.0;

/// Configuration for the search service and its upstream client
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// NCBI API key; raises the upstream rate ceiling from 3 to 10 req/s
    pub api_key: Option<String>,
    /// Override for the E-utilities base URL (used by tests)
    pub base_url: Option<String>,
    /// Override for the outbound rate ceiling
    pub rate_limit: Option<f64>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Records requested per search page (`retmax`)
    pub page_size: usize,
    /// Maximum authors listed in a citation before truncating to "et al"
    pub max_cited_authors: usize,
    /// Retry policy for upstream requests
    pub retry: RetryConfig,
    /// Response cache sizing, TTL and backend
    pub cache: CacheConfig,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            page_size: 10,
            max_cited_authors: 6,
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Set the NCBI API key
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point the client at a different E-utilities base URL
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the outbound rate ceiling (requests per second)
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limit = Some(requests_per_second);
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of records per search page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the citation author-list truncation threshold
    pub fn with_max_cited_authors(mut self, max_cited_authors: usize) -> Self {
        self.max_cited_authors = max_cited_authors.max(1);
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cache configuration
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the cache entry TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.time_to_live = ttl;
        self
    }

    /// The rate ceiling in effect: an explicit override wins, otherwise
    /// the NCBI ceiling for keyed (10/s) or unkeyed (3/s) access
    pub fn effective_rate_limit(&self) -> f64 {
        match self.rate_limit {
            Some(rate) => rate,
            None if self.api_key.is_some() => RATE_LIMIT_WITH_KEY,
            None => RATE_LIMIT_DEFAULT,
        }
    }

    /// The E-utilities base URL in effect
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Create the process-wide rate limiter for this configuration
    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }

    /// Extra query parameters appended to every upstream request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        params
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}
