//! In-memory TTL cache for derived exchange data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache keys shared across the crate.
pub struct CacheKeys;

impl CacheKeys {
    const PREFIX: &'static str = "crypto";

    pub fn common_pairs() -> String {
        format!("{}:commonPairs", Self::PREFIX)
    }

    pub fn prices(exchange: &str) -> String {
        format!("{}:prices:{}", Self::PREFIX, exchange)
    }
}

/// Keyed values that expire `ttl` after they are written.
///
/// A zero TTL turns every `put` into a no-op. Clones share the same map;
/// concurrent writers of one key are last-write-wins.
#[derive(Debug, Clone)]
pub struct CacheStore<V> {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, (Instant, V)>>>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fresh value for `key`, or `None` when missing or expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(expires_at, _)| Instant::now() < *expires_at)
            .map(|(_, value)| value.clone())
    }

    /// Stores `value` and drops whatever else has expired.
    pub async fn put(&self, key: String, value: V) {
        if self.ttl.is_zero() {
            return;
        }

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(key, (now + self.ttl, value));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
