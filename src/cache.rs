//! Response caching keyed by the effective upstream request
//!
//! Cache keys are fully-resolved request fingerprints (endpoint, effective
//! query, pagination), so a hit means the identical upstream round trips
//! have already been made within the TTL window. The cache is strictly an
//! optimization: a backend failure degrades `get` to a miss and `insert`
//! to a no-op, never to a request-level error.

use moka::future::Cache as MokaCache;
use std::hash::Hash;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::ArticleSummary;

/// Selects which storage backend to use for caching
#[derive(Debug, Clone)]
pub enum CacheBackendConfig {
    /// In-memory cache using Moka (default)
    Memory,
    /// Redis-backed cache shared across processes
    ///
    /// Requires the `cache-redis` feature.
    #[cfg(feature = "cache-redis")]
    Redis {
        /// Redis connection URL, e.g. `"redis://127.0.0.1/"`
        url: String,
    },
}

impl Default for CacheBackendConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Configuration for response caching
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (used by the memory backend)
    pub max_capacity: u64,
    /// Time-to-live for cached entries
    pub time_to_live: Duration,
    /// Which storage backend to use
    pub backend: CacheBackendConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            time_to_live: Duration::from_secs(3600), // 1 hour
            backend: CacheBackendConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory backend
// ---------------------------------------------------------------------------

/// In-memory cache backed by Moka
#[derive(Clone)]
pub struct MemoryCache<K, V> {
    cache: MokaCache<K, V>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .build();
        Self { cache }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let result = self.cache.get(key).await;
        if result.is_some() {
            debug!("Cache hit");
        } else {
            debug!("Cache miss");
        }
        result
    }

    pub async fn insert(&self, key: K, value: V) {
        self.cache.insert(key, value).await;
        info!("Response cached");
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        info!("Cache cleared");
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

// ---------------------------------------------------------------------------
// Redis backend (feature = "cache-redis")
// ---------------------------------------------------------------------------

/// Redis-backed cache using JSON serialization.
///
/// TTL is applied per entry via `SET … EX`, so expiry is enforced by the
/// store itself. Every operation that touches Redis swallows connection
/// and protocol errors: an unreachable backend turns `get` into a miss
/// and `insert` into a no-op.
#[cfg(feature = "cache-redis")]
#[derive(Clone)]
pub struct RedisCache {
    client: redis::Client,
    ttl: Duration,
}

#[cfg(feature = "cache-redis")]
impl RedisCache {
    pub fn new(url: &str, ttl: Duration) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client, ttl })
    }

    pub async fn get(&self, key: &str) -> Option<Vec<ArticleSummary>> {
        use redis::AsyncCommands;
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Redis unreachable, treating as cache miss");
                return None;
            }
        };
        let json: String = conn.get(key).await.ok()?;
        if json.is_empty() {
            return None;
        }
        let value = serde_json::from_str(&json).ok();
        if value.is_some() {
            debug!("Cache hit (Redis)");
        } else {
            debug!("Cache miss (Redis): deserialization failed");
        }
        value
    }

    pub async fn insert(&self, key: String, value: &[ArticleSummary]) {
        use redis::AsyncCommands;
        let Ok(mut conn) = self.client.get_multiplexed_async_connection().await else {
            debug!("Redis unreachable, skipping cache write");
            return;
        };
        let Ok(json) = serde_json::to_string(value) else {
            return;
        };
        let ttl_secs = self.ttl.as_secs();
        let _: Result<(), _> = conn.set_ex(key, json, ttl_secs).await;
        info!("Response cached (Redis)");
    }

    pub async fn clear(&self) {
        let Ok(mut conn) = self.client.get_multiplexed_async_connection().await else {
            return;
        };
        let _: Result<(), _> = redis::cmd("FLUSHDB").query_async(&mut conn).await;
        info!("Cache cleared (Redis)");
    }

    /// Always returns 0; Redis does not provide a per-prefix key count
    /// without a full scan.
    pub fn entry_count(&self) -> u64 {
        0
    }

    pub async fn sync(&self) {
        // No-op for Redis
    }
}

// ---------------------------------------------------------------------------
// Unified ResponseCache enum
// ---------------------------------------------------------------------------

/// Search response cache that dispatches to the configured backend.
#[derive(Clone)]
pub enum ResponseCache {
    Memory(MemoryCache<String, Vec<ArticleSummary>>),
    #[cfg(feature = "cache-redis")]
    Redis(RedisCache),
}

impl ResponseCache {
    pub async fn get(&self, key: &str) -> Option<Vec<ArticleSummary>> {
        match self {
            ResponseCache::Memory(c) => c.get(&key.to_owned()).await,
            #[cfg(feature = "cache-redis")]
            ResponseCache::Redis(c) => c.get(key).await,
        }
    }

    pub async fn insert(&self, key: String, value: Vec<ArticleSummary>) {
        match self {
            ResponseCache::Memory(c) => c.insert(key, value).await,
            #[cfg(feature = "cache-redis")]
            ResponseCache::Redis(c) => c.insert(key, &value).await,
        }
    }

    pub async fn clear(&self) {
        match self {
            ResponseCache::Memory(c) => c.clear().await,
            #[cfg(feature = "cache-redis")]
            ResponseCache::Redis(c) => c.clear().await,
        }
    }

    pub fn entry_count(&self) -> u64 {
        match self {
            ResponseCache::Memory(c) => c.entry_count(),
            #[cfg(feature = "cache-redis")]
            ResponseCache::Redis(c) => c.entry_count(),
        }
    }

    pub async fn sync(&self) {
        match self {
            ResponseCache::Memory(c) => c.sync().await,
            #[cfg(feature = "cache-redis")]
            ResponseCache::Redis(c) => c.sync().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a [`ResponseCache`] from configuration.
///
/// Falls back to the memory backend if the configured backend cannot be
/// initialised (error is logged via `tracing::error!`).
pub fn create_cache(config: &CacheConfig) -> ResponseCache {
    match &config.backend {
        CacheBackendConfig::Memory => ResponseCache::Memory(MemoryCache::new(config)),
        #[cfg(feature = "cache-redis")]
        CacheBackendConfig::Redis { url } => match RedisCache::new(url, config.time_to_live) {
            Ok(c) => ResponseCache::Redis(c),
            Err(e) => {
                tracing::error!("Failed to create Redis cache, falling back to memory: {e}");
                ResponseCache::Memory(MemoryCache::new(config))
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
