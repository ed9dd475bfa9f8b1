//! Rate limiting for NCBI E-utilities compliance
//!
//! NCBI enforces a hard ceiling of 3 requests/second without an API key
//! and 10 requests/second with one; violations can result in IP blocking.
//! A single process-wide token bucket gates every outbound call.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

/// Token bucket rate limiter shared by all callers to the upstream service
///
/// Tokens replenish continuously at the configured rate up to a burst
/// capacity of one second of budget. `acquire` consumes one token,
/// sleeping until replenishment makes one available.
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Create a new rate limiter with the specified rate (requests per second)
    pub fn new(rate: f64) -> Self {
        let rate = rate.max(0.001);
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Rate limiter for the NCBI API without an API key (3 requests/second)
    pub fn ncbi_default() -> Self {
        Self::new(3.0)
    }

    /// Rate limiter for the NCBI API with an API key (10 requests/second)
    pub fn ncbi_with_key() -> Self {
        Self::new(10.0)
    }

    /// Acquire a token, waiting for replenishment if none is available.
    ///
    /// Never fails, only delays. The wait is bounded: the sleep duration is
    /// derived from the current token deficit, so a waiting caller is
    /// granted a token as soon as replenishment catches up.
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().unwrap();
                bucket.refill(Instant::now());

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    debug!(remaining_tokens = %bucket.tokens, "Token acquired");
                    None
                } else {
                    let deficit = 1.0 - bucket.tokens;
                    Some(Duration::from_secs_f64(deficit / bucket.refill_rate))
                }
            };

            match wait {
                None => return,
                Some(duration) => {
                    debug!(
                        wait_ms = duration.as_millis() as u64,
                        "No tokens available, waiting for refill"
                    );
                    tokio::time::sleep(duration).await;
                }
            }
        }
    }

    /// Check whether a token is available without consuming one
    pub fn check_available(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap();
        bucket.refill(Instant::now());
        bucket.tokens >= 1.0
    }

    /// Current token count (for testing and monitoring)
    pub fn token_count(&self) -> f64 {
        let mut bucket = self.bucket.lock().unwrap();
        bucket.refill(Instant::now());
        bucket.tokens
    }

    /// The configured rate limit (requests per second)
    pub fn rate(&self) -> f64 {
        self.bucket.lock().unwrap().refill_rate
    }
}
