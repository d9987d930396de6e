//! In-memory TTL cache for API responses.
//!
//! Keys are `"{kind}-{params}"` strings so distinct requests for the
//! same coin never collide across endpoints. The check-then-fetch path
//! is deliberately unlocked; two tasks may fetch the same key
//! concurrently and the second insert wins, which is harmless for
//! idempotent reads.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Price,
    News,
    Historical,
    Sentiment,
}

impl CacheKind {
    pub fn ttl(self) -> Duration {
        match self {
            CacheKind::Price => Duration::from_secs(60),
            CacheKind::News => Duration::from_secs(900),
            CacheKind::Historical => Duration::from_secs(300),
            CacheKind::Sentiment => Duration::from_secs(1800),
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CacheKind::Price => "price",
            CacheKind::News => "news",
            CacheKind::Historical => "historical",
            CacheKind::Sentiment => "sentiment",
        };
        write!(f, "{label}")
    }
}

pub fn cache_key(kind: CacheKind, params: &str) -> String {
    format!("{kind}-{params}")
}

pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the entry if it is still within the TTL for `kind`.
    pub fn get(&self, kind: CacheKind, key: &str) -> Option<V> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(key).and_then(|(value, stored_at)| {
            if stored_at.elapsed() < kind.ttl() {
                Some(value.clone())
            } else {
                None
            }
        })
    }

    /// Returns the entry regardless of age. Used as a stale fallback
    /// when the upstream request fails.
    pub fn get_any(&self, key: &str) -> Option<V> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(key).map(|(value, _)| value.clone())
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key, (value, Instant::now()));
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_includes_kind() {
        assert_eq!(cache_key(CacheKind::Price, "bitcoin"), "price-bitcoin");
        assert_eq!(
            cache_key(CacheKind::Historical, "bitcoin-200"),
            "historical-bitcoin-200"
        );
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = TtlCache::new();
        cache.insert("price-bitcoin".to_string(), 42.0_f64);

        assert_eq!(cache.get(CacheKind::Price, "price-bitcoin"), Some(42.0));
        assert_eq!(cache.get(CacheKind::Price, "price-ethereum"), None);
    }

    #[test]
    fn test_get_any_ignores_ttl() {
        let cache = TtlCache::new();
        cache.insert("news-bitcoin".to_string(), vec!["headline".to_string()]);
        assert!(cache.get_any("news-bitcoin").is_some());
        assert!(cache.get_any("news-ethereum").is_none());
    }

    #[test]
    fn test_ttls_grow_with_volatility_of_content() {
        assert!(CacheKind::Price.ttl() < CacheKind::Historical.ttl());
        assert!(CacheKind::Historical.ttl() < CacheKind::News.ttl());
        assert!(CacheKind::News.ttl() < CacheKind::Sentiment.ttl());
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = TtlCache::new();
        cache.insert("price-bitcoin".to_string(), 1.0_f64);
        cache.insert("price-bitcoin".to_string(), 2.0_f64);
        assert_eq!(cache.get(CacheKind::Price, "price-bitcoin"), Some(2.0));
    }
}
