//! Retry support for transient upstream failures
//!
//! The upstream E-utilities service occasionally drops connections or
//! returns 5xx/429 responses. Operations are retried at most
//! `RetryConfig::max_retries` times with a short fixed backoff; any
//! non-transient failure propagates immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Classifies errors as transient (worth retrying) or terminal.
pub trait RetryableError {
    /// Whether this error is transient and the operation may succeed on retry.
    fn is_retryable(&self) -> bool;

    /// Short human-readable reason, used in retry log lines.
    fn retry_reason(&self) -> &str;
}

/// Retry policy for upstream requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            delay: Duration::from_millis(500),
        }
    }
}

/// Run `operation`, retrying transient failures per `config`.
///
/// The final error is returned unchanged once the retry budget is spent
/// or a non-retryable error occurs.
pub async fn with_retry<T, E, F, Fut>(
    mut operation: F,
    config: &RetryConfig,
    description: &str,
) -> Result<T, E>
where
    E: RetryableError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    reason = err.retry_reason(),
                    "{description} failed, retrying after backoff"
                );
                tokio::time::sleep(config.delay).await;
            }
            Err(err) => {
                debug!(
                    attempt,
                    retryable = err.is_retryable(),
                    "{description} failed, not retrying"
                );
                return Err(err);
            }
        }
    }
}
