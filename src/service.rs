//! Search orchestration: query building, cache lookup, upstream fetch,
//! transformation
//!
//! [`SearchService`] is the composition root. Each operation builds the
//! effective query, consults the response cache, and only on a miss goes
//! upstream through the rate-limited client. A page of zero IDs is a
//! valid (and cached) empty result, not an error.

use tracing::{debug, info, instrument};

use crate::cache::{create_cache, ResponseCache};
use crate::client::{DateWindow, EutilsClient};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::models::{ArticleSummary, Citation};
use crate::query::{SearchField, SearchQuery};
use crate::transform::{parse_guideline_summaries, parse_summaries, to_citations};

/// High-level search service over the E-utilities client
///
/// Cloning is cheap and clones share the same rate limiter; the response
/// cache is shared through its own internal handles.
#[derive(Clone)]
pub struct SearchService {
    client: EutilsClient,
    cache: ResponseCache,
}

impl SearchService {
    /// Create a service with default configuration
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::new())
    }

    /// Create a service with custom configuration
    pub fn with_config(config: ServiceConfig) -> Self {
        let cache = create_cache(&config.cache);
        let client = EutilsClient::with_config(config);
        Self { client, cache }
    }

    /// The response cache backing this service
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Search for articles and return their summaries
    ///
    /// `field` optionally restricts the query to a recognized search
    /// field (for example `"Author"` or `"Title/Abstract"`); an
    /// unrecognized field fails before any upstream call is made. `page`
    /// is zero-based.
    #[instrument(skip(self), fields(text = %text, page = page))]
    pub async fn search(
        &self,
        text: &str,
        field: Option<&str>,
        page: usize,
    ) -> Result<Vec<ArticleSummary>> {
        self.search_with_window(text, field, page, None).await
    }

    /// Alias for [`search`](Self::search)
    pub async fn search_summaries(
        &self,
        text: &str,
        field: Option<&str>,
        page: usize,
    ) -> Result<Vec<ArticleSummary>> {
        self.search(text, field, page).await
    }

    /// [`search`](Self::search) with an optional publication-date window
    pub async fn search_with_window(
        &self,
        text: &str,
        field: Option<&str>,
        page: usize,
        window: Option<&DateWindow>,
    ) -> Result<Vec<ArticleSummary>> {
        let field = field.map(SearchField::parse).transpose()?;
        let term = SearchQuery::new(text).field_opt(field).build()?;

        let key = self.cache_key("summary", page, &term, window);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(key = %key, "Cache hit for summary search");
            return Ok(cached);
        }

        let summaries = self
            .fetch_summaries(&term, page, window)
            .await
            .map_err(|e| e.into_public())?;

        info!(count = summaries.len(), "Summary search completed");
        self.cache.insert(key, summaries.clone()).await;
        Ok(summaries)
    }

    /// Search for clinical guideline articles with free full text
    ///
    /// The query is augmented with the fixed guideline publication-type
    /// and free-full-text filters, and detail records are fetched so the
    /// summaries come from the richer XML payload.
    #[instrument(skip(self), fields(text = %text, page = page))]
    pub async fn search_guidelines(
        &self,
        text: &str,
        page: usize,
    ) -> Result<Vec<ArticleSummary>> {
        let term = SearchQuery::new(text).guidelines().build()?;

        let key = self.cache_key("guidelines", page, &term, None);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(key = %key, "Cache hit for guideline search");
            return Ok(cached);
        }

        let summaries = self
            .fetch_guideline_summaries(&term, page)
            .await
            .map_err(|e| e.into_public())?;

        info!(count = summaries.len(), "Guideline search completed");
        self.cache.insert(key, summaries.clone()).await;
        Ok(summaries)
    }

    /// Search for articles and return AMA-style citations with links
    ///
    /// Reuses the summary pipeline (first page), so a cached summary
    /// search serves citation requests without another upstream call.
    #[instrument(skip(self), fields(text = %text))]
    pub async fn search_citations(
        &self,
        text: &str,
        field: Option<&str>,
    ) -> Result<Vec<Citation>> {
        let summaries = self.search(text, field, 0).await?;
        let max_authors = self.client.config().max_cited_authors;
        Ok(to_citations(&summaries, max_authors))
    }

    async fn fetch_summaries(
        &self,
        term: &str,
        page: usize,
        window: Option<&DateWindow>,
    ) -> Result<Vec<ArticleSummary>> {
        let ids = self.client.fetch_search_ids(term, page, window).await?;
        if ids.is_empty() {
            debug!(term = %term, "No matching record IDs");
            return Ok(Vec::new());
        }

        let json = self.client.fetch_summary_records(&ids).await?;
        parse_summaries(&json)
    }

    async fn fetch_guideline_summaries(
        &self,
        term: &str,
        page: usize,
    ) -> Result<Vec<ArticleSummary>> {
        let ids = self.client.fetch_search_ids(term, page, None).await?;
        if ids.is_empty() {
            debug!(term = %term, "No matching guideline IDs");
            return Ok(Vec::new());
        }

        let xml = self.client.fetch_detail_records(&ids).await?;
        parse_guideline_summaries(&xml)
    }

    /// Deterministic cache key for one logical request
    ///
    /// Identical term, page size, page, endpoint, and date window always
    /// yield the same key; any difference in the effective upstream
    /// request yields a distinct one. Windowless requests carry no date
    /// segments, so they can never collide with windowed ones.
    fn cache_key(
        &self,
        endpoint: &str,
        page: usize,
        term: &str,
        window: Option<&DateWindow>,
    ) -> String {
        let mut key = format!(
            "pubmed:{}:retmax={}:page={}:term={}",
            endpoint,
            self.client.config().page_size,
            page,
            term
        );
        if let Some(window) = window.filter(|w| !w.is_empty()) {
            key.push_str(&format!(
                ":mindate={}:maxdate={}",
                window.min_date.as_deref().unwrap_or(""),
                window.max_date.as_deref().unwrap_or("")
            ));
        }
        key
    }
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}
