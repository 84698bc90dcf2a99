//! Query Client
//!
//! Cached, retrying access to the request API. Reads are served from the
//! query cache while fresh; `refetch_*` always goes to the API and refreshes
//! the cache. A failed fetch leaves any existing entry in place.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::query_cache::{QueryCache, QueryCacheConfig, QueryKey};
use super::retry::RetryPolicy;
use crate::domain::{CanonicalToken, TrendingEntry};
use crate::ports::{Clock, FeedError, SystemClock, TokenFeed};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryClientConfig {
    pub cache: QueryCacheConfig,
    pub retry: RetryPolicy,
}

pub struct QueryClient {
    feed: Arc<dyn TokenFeed>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    tokens: Mutex<QueryCache<CanonicalToken>>,
    trending: Mutex<QueryCache<Vec<TrendingEntry>>>,
}

impl QueryClient {
    pub fn new(feed: Arc<dyn TokenFeed>, config: QueryClientConfig) -> Self {
        Self::with_clock(feed, Arc::new(SystemClock), config)
    }

    pub fn with_clock(feed: Arc<dyn TokenFeed>, clock: Arc<dyn Clock>, config: QueryClientConfig) -> Self {
        Self {
            feed,
            clock,
            retry: config.retry,
            tokens: Mutex::new(QueryCache::new(config.cache)),
            trending: Mutex::new(QueryCache::new(config.cache)),
        }
    }

    /// Token data, from cache while fresh
    pub async fn token(&self, symbol: &str) -> Result<CanonicalToken, FeedError> {
        let key = QueryKey::token(symbol);
        if let Some(token) = self.tokens.lock().await.get_fresh(&key, self.clock.now()) {
            tracing::debug!(symbol, "Token served from query cache");
            return Ok(token);
        }
        self.refetch_token(symbol).await
    }

    /// Fetch token data regardless of freshness
    pub async fn refetch_token(&self, symbol: &str) -> Result<CanonicalToken, FeedError> {
        let key = QueryKey::token(symbol);
        let token = self
            .retry
            .run(|| self.feed.fetch_token(symbol))
            .await
            .inspect_err(|e| tracing::warn!(symbol, error = %e, "Token fetch failed"))?;

        self.tokens.lock().await.insert(key, token.clone(), self.clock.now());
        Ok(token)
    }

    /// Trending list, from cache while fresh
    pub async fn trending(&self) -> Result<Vec<TrendingEntry>, FeedError> {
        if let Some(entries) = self.trending.lock().await.get_fresh(&QueryKey::Trending, self.clock.now()) {
            tracing::debug!("Trending served from query cache");
            return Ok(entries);
        }
        self.refetch_trending().await
    }

    /// Fetch the trending list regardless of freshness
    pub async fn refetch_trending(&self) -> Result<Vec<TrendingEntry>, FeedError> {
        let entries = self
            .retry
            .run(|| self.feed.fetch_trending())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Trending fetch failed"))?;

        self.trending
            .lock()
            .await
            .insert(QueryKey::Trending, entries.clone(), self.clock.now());
        Ok(entries)
    }

    /// Cached token data of any age (until garbage-collected)
    pub async fn cached_token(&self, symbol: &str) -> Option<CanonicalToken> {
        self.tokens.lock().await.get(&QueryKey::token(symbol), self.clock.now())
    }

    pub async fn is_token_fresh(&self, symbol: &str) -> bool {
        self.tokens.lock().await.is_fresh(&QueryKey::token(symbol), self.clock.now())
    }

    /// Drop entries past the GC window, returning how many were removed
    pub async fn collect_garbage(&self) -> usize {
        let now = self.clock.now();
        let removed = self.tokens.lock().await.collect_garbage(now)
            + self.trending.lock().await.collect_garbage(now);
        if removed > 0 {
            tracing::debug!(removed, "Collected stale query cache entries");
        }
        removed
    }
}

/// Canonical token fixture shared by client tests
#[cfg(test)]
pub(crate) fn sample_token(symbol: &str, price: f64) -> CanonicalToken {
    use crate::domain::SolanaDetails;

    CanonicalToken {
        id: symbol.to_lowercase(),
        name: symbol.to_string(),
        symbol: symbol.to_uppercase(),
        price,
        market_cap: 0.0,
        volume_24h: 0.0,
        price_change_24h: 0.0,
        price_change_percent_24h: 0.0,
        solana: SolanaDetails {
            name: symbol.to_string(),
            symbol: symbol.to_uppercase(),
            supply: 0.0,
            decimals: 9,
            mint_address: None,
            logo_uri: None,
        },
    }
}
