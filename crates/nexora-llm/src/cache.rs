//! LLM response caching

use crate::client::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// LLM cache trait
#[async_trait]
pub trait LLMCache: Send + Sync {
    /// Get a cached response
    async fn get(&self, request: &LLMRequest) -> Option<LLMResponse>;

    /// Store a response in cache
    async fn set(&self, request: LLMRequest, response: LLMResponse);

    /// Clear the cache
    async fn clear(&self);
}

/// Default number of cached completions
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default lifetime of a cached completion
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    response: LLMResponse,
    stored_at: Instant,
}

/// In-memory LLM cache backed by a concurrent map
///
/// Holds at most `capacity` completions; inserting into a full cache evicts
/// the oldest entry. Entries older than `ttl` are treated as missing.
pub struct InMemoryLLMCache {
    entries: DashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

impl Default for InMemoryLLMCache {
    fn default() -> Self {
        Self::with_limits(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl InMemoryLLMCache {
    /// Create a new in-memory cache with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `capacity` entries (minimum 1) for `ttl`
    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every field that influences the completion is part of the key
    fn cache_key(request: &LLMRequest) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            request.model,
            request.system.as_deref().unwrap_or(""),
            request.max_tokens.unwrap_or(0),
            request.temperature.unwrap_or(0.0),
            request.prompt,
        )
    }

    fn evict_for(&self, key: &str) {
        if self.entries.contains_key(key) {
            return;
        }

        self.entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);

        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().stored_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl LLMCache for InMemoryLLMCache {
    async fn get(&self, request: &LLMRequest) -> Option<LLMResponse> {
        let key = Self::cache_key(request);
        let fresh = {
            let entry = self.entries.get(&key)?;
            (entry.stored_at.elapsed() < self.ttl).then(|| entry.response.clone())
        };

        if fresh.is_none() {
            self.entries
                .remove_if(&key, |_, entry| entry.stored_at.elapsed() >= self.ttl);
            debug!("expired cache entry dropped");
        }
        fresh
    }

    async fn set(&self, request: LLMRequest, response: LLMResponse) {
        let key = Self::cache_key(&request);
        self.evict_for(&key);
        self.entries.insert(
            key,
            CacheEntry {
                response,
                stored_at: Instant::now(),
            },
        );
    }

    async fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_set() {
        let cache = InMemoryLLMCache::new();

        let request = LLMRequest::new("Test prompt", "gemini-2.5-flash");
        let response = LLMResponse::new("Test response", "gemini-2.5-flash");

        assert!(cache.get(&request).await.is_none());

        cache.set(request.clone(), response).await;
        let cached = cache.get(&request).await;
        assert_eq!(cached.unwrap().content, "Test response");
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = InMemoryLLMCache::new();
        let request = LLMRequest::new("Test", "gemini-2.5-flash");

        cache
            .set(request.clone(), LLMResponse::new("Response", "gemini-2.5-flash"))
            .await;
        assert_eq!(cache.len(), 1);

        cache.clear().await;
        assert!(cache.is_empty());
        assert!(cache.get(&request).await.is_none());
    }

    #[test]
    fn test_cache_key_includes_sampling_parameters() {
        let cache = InMemoryLLMCache::new();
        let cold = LLMRequest::new("Same prompt", "m").with_temperature(0.0);
        let warm = LLMRequest::new("Same prompt", "m").with_temperature(0.9);

        tokio_test::block_on(async {
            cache.set(cold.clone(), LLMResponse::new("cold", "m")).await;
            assert!(cache.get(&warm).await.is_none());
            assert_eq!(cache.get(&cold).await.unwrap().content, "cold");
        });
    }

    #[tokio::test]
    async fn test_full_cache_evicts_oldest() {
        let cache = InMemoryLLMCache::with_limits(2, DEFAULT_CACHE_TTL);
        let first = LLMRequest::new("first", "m");
        let second = LLMRequest::new("second", "m");
        let third = LLMRequest::new("third", "m");

        cache.set(first.clone(), LLMResponse::new("1", "m")).await;
        std::thread::sleep(Duration::from_millis(2));
        cache.set(second.clone(), LLMResponse::new("2", "m")).await;
        std::thread::sleep(Duration::from_millis(2));
        cache.set(third.clone(), LLMResponse::new("3", "m")).await;

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&first).await.is_none());
        assert_eq!(cache.get(&second).await.unwrap().content, "2");
        assert_eq!(cache.get(&third).await.unwrap().content, "3");
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = InMemoryLLMCache::with_limits(2, DEFAULT_CACHE_TTL);
        let first = LLMRequest::new("first", "m");
        let second = LLMRequest::new("second", "m");

        cache.set(first.clone(), LLMResponse::new("1", "m")).await;
        cache.set(second.clone(), LLMResponse::new("2", "m")).await;
        cache.set(second.clone(), LLMResponse::new("2b", "m")).await;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&first).await.unwrap().content, "1");
        assert_eq!(cache.get(&second).await.unwrap().content, "2b");
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryLLMCache::with_limits(8, Duration::from_millis(5));
        let request = LLMRequest::new("Test", "m");

        cache.set(request.clone(), LLMResponse::new("stale", "m")).await;
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.get(&request).await.is_none());
        assert!(cache.is_empty());
    }
}
