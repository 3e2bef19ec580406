//! Result cache: process-scoped memoization for expensive model calls.
//!
//! One instance per task, created in `main` and shared through `AppState`.
//! Entries live until `clear()` or process exit unless a TTL is configured.
//! Concurrent misses on the same key may both compute; the last write wins
//! and each write replaces the entry atomically.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

/// Separator between key parts. Parts are normalized so it cannot be confused
/// with content that matters for lookups.
const KEY_DELIMITER: char = '|';

pub struct ResultCache<V> {
    entries: RwLock<HashMap<String, CachedValue<V>>>,
    ttl: Option<Duration>,
}

struct CachedValue<V> {
    value: V,
    inserted_at: Instant,
}

impl<V: Clone> ResultCache<V> {
    /// Unbounded cache without expiry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Cache whose entries are ignored (and replaced on next compute) once older than `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Returns the cached value for `key`, if present and fresh.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if self.is_expired(entry) {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.into(),
            CachedValue {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value for `key`, or runs `compute`, stores a successful
    /// result and returns it. Errors are returned as-is and never cached.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            debug!("cache hit: {key}");
            return Ok(hit);
        }

        debug!("cache miss: {key}");
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CachedValue<V>) -> bool {
        self.ttl
            .map(|ttl| entry.inserted_at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds composite cache keys: a task discriminator followed by normalized parts.
///
/// Every part is trimmed and lowercased; `sorted_parts` additionally sorts and
/// dedups a list so order and case differences map to the same key.
#[derive(Debug, Clone)]
pub struct CacheKey {
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(task: &str) -> Self {
        Self {
            parts: vec![normalize(task)],
        }
    }

    pub fn part(mut self, value: impl ToString) -> Self {
        self.parts.push(normalize(&value.to_string()));
        self
    }

    pub fn sorted_parts<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        let mut normalized: Vec<String> = values.iter().map(|v| normalize(v.as_ref())).collect();
        normalized.sort();
        normalized.dedup();
        self.parts.push(normalized.join(","));
        self
    }

    pub fn build(self) -> String {
        self.parts.join(&KEY_DELIMITER.to_string())
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(KEY_DELIMITER, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_or_compute_runs_once_per_key() {
        let cache: ResultCache<String> = ResultCache::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_compute("k", || async {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>("computed".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "computed");
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new();

        let first = cache.get_or_compute("k", || async { Err::<u32, _>("boom") }).await;
        assert_eq!(first, Err("boom"));
        assert!(cache.is_empty());

        let second = cache.get_or_compute("k", || async { Ok::<_, &str>(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_clear_forces_recompute() {
        let cache: ResultCache<u32> = ResultCache::new();
        cache.insert("k", 1);
        cache.clear();
        assert!(cache.get("k").is_none());

        let value = cache.get_or_compute("k", || async { Ok::<_, ()>(2) }).await;
        assert_eq!(value, Ok(2));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache: ResultCache<u32> = ResultCache::with_ttl(Duration::ZERO);
        cache.insert("k", 1);
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_long_ttl_keeps_entry() {
        let cache: ResultCache<u32> = ResultCache::with_ttl(Duration::from_secs(3600));
        cache.insert("k", 1);
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test]
    async fn test_concurrent_callers_see_a_consistent_value() {
        let cache: Arc<ResultCache<String>> = Arc::new(ResultCache::new());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("shared", || async { Ok::<_, ()>("v".to_string()) })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "v");
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_key_normalizes_case_and_order() {
        let a = CacheKey::new("interview")
            .part("  Backend Engineer ")
            .sorted_parts(&["Rust", "sql"])
            .part(5)
            .build();
        let b = CacheKey::new("INTERVIEW")
            .part("backend engineer")
            .sorted_parts(&["SQL", "rust", "Rust"])
            .part(5)
            .build();
        assert_eq!(a, b);
        assert_eq!(a, "interview|backend engineer|rust,sql|5");
    }

    #[test]
    fn test_cache_key_parts_cannot_smuggle_delimiter() {
        let key = CacheKey::new("t").part("a|b").build();
        assert_eq!(key, "t|a b");
    }
}
