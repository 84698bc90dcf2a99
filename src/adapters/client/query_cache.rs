//! Query Cache
//!
//! Client-side cache for API responses.
//! - Entries younger than `stale_time` are fresh and served without a request
//! - Entries older than `gc_time` are dropped on the next collection
//!
//! Times are passed in explicitly so the cache itself is clock-free.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Cache key: one entry per lowercased symbol, plus the trending list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Token(String),
    Trending,
}

impl QueryKey {
    pub fn token(symbol: &str) -> Self {
        QueryKey::Token(symbol.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCacheConfig {
    pub stale_time: Duration,
    pub gc_time: Duration,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            gc_time: Duration::from_secs(300),
        }
    }
}

/// Cached value with the time it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub updated_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Age at `now`; clock skew into the past counts as zero
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.updated_at).to_std().unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    config: QueryCacheConfig,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> QueryCacheConfig {
        self.config
    }

    pub fn insert(&mut self, key: QueryKey, value: V, now: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { value, updated_at: now });
    }

    /// Value only if it is still fresh
    pub fn get_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| entry.age(now) < self.config.stale_time)
            .map(|entry| entry.value.clone())
    }

    /// Value of any age that has not yet been garbage-collected
    pub fn get(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| entry.age(now) < self.config.gc_time)
            .map(|entry| entry.value.clone())
    }

    pub fn is_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> bool {
        self.get_fresh(key, now).is_some()
    }

    /// Drop entries older than `gc_time`, returning how many were removed
    pub fn collect_garbage(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let gc_time = self.config.gc_time;
        self.entries.retain(|_, entry| entry.age(now) < gc_time);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
