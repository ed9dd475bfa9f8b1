//! PubMed search service core: query building, rate limiting, caching,
//! and transformation of NCBI E-utilities responses.
//!
//! The crate wraps three E-utilities endpoints (ESearch, ESummary,
//! EFetch) behind a single [`SearchService`] that produces article
//! summaries, guideline summaries, and AMA-style citations.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pubmed_search::{SearchService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SearchService::with_config(
//!         ServiceConfig::new().with_api_key("your-ncbi-api-key"),
//!     );
//!
//!     let summaries = service.search("covid-19 vaccine", None, 0).await?;
//!     for summary in &summaries {
//!         println!("{}: {}", summary.pmid, summary.title);
//!     }
//!
//!     let citations = service.search_citations("covid-19 vaccine", None).await?;
//!     for citation in &citations {
//!         println!("{} <{}>", citation.citation, citation.link);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! All upstream calls share a token-bucket [`RateLimiter`] honoring the
//! NCBI guidelines: 3 requests/second without an API key, 10 with one.
//! Burst capacity equals the sustained rate; beyond it, callers are
//! paced, never rejected.
//!
//! # Caching
//!
//! Responses are cached post-transformation under a deterministic key
//! derived from the effective query, page, and page size. The default
//! backend is in-memory ([`moka`]); a Redis backend is available behind
//! the `cache-redis` feature and degrades to cache misses when the
//! server is unreachable.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod rate_limit;
pub mod retry;
pub mod service;
pub mod transform;

mod responses;

pub use cache::{CacheBackendConfig, CacheConfig, ResponseCache};
pub use client::{DateWindow, EutilsClient};
pub use config::ServiceConfig;
pub use error::{Result, SearchError};
pub use models::{ArticleSummary, Citation};
pub use query::{SearchField, SearchQuery};
pub use rate_limit::RateLimiter;
pub use retry::{with_retry, RetryConfig, RetryableError};
pub use service::SearchService;
pub use transform::{format_ama_citation, parse_guideline_summaries, parse_summaries, to_citations};
