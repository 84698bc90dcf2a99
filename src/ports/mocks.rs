//! Recording mocks for every port
//!
//! Each mock counts its calls and returns scripted responses, so tests can
//! assert both on results and on which upstreams were hit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    Clock, DexPriceSource, FeedError, MarketAggregatorSource, PortResult, SupplySource,
    TokenDirectorySource, TokenFeed, UpstreamError,
};
use crate::domain::{CanonicalToken, PriceQuote, TokenListEntry, TokenSupply, TrendingEntry};

fn unavailable(what: &str) -> UpstreamError {
    UpstreamError::Transport(format!("{} unavailable", what))
}

/// Manually advanced clock
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Directory source with a switchable failure mode
#[derive(Debug, Default)]
pub struct MockDirectorySource {
    entries: Mutex<Vec<TokenListEntry>>,
    failing: Mutex<bool>,
    calls: AtomicUsize,
}

impl MockDirectorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(self, entries: Vec<TokenListEntry>) -> Self {
        *self.entries.lock().unwrap() = entries;
        self
    }

    pub fn set_entries(&self, entries: Vec<TokenListEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenDirectorySource for MockDirectorySource {
    async fn fetch_directory(&self) -> PortResult<Vec<TokenListEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(unavailable("directory"));
        }
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Supply source keyed by mint; unknown mints fail
#[derive(Debug, Default)]
pub struct MockSupplySource {
    supplies: Mutex<HashMap<String, TokenSupply>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSupplySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supply(self, mint: &str, amount: &str, decimals: u8) -> Self {
        self.supplies.lock().unwrap().insert(
            mint.to_string(),
            TokenSupply { amount: amount.to_string(), decimals },
        );
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SupplySource for MockSupplySource {
    async fn token_supply(&self, mint: &str) -> PortResult<TokenSupply> {
        self.calls.lock().unwrap().push(mint.to_string());
        self.supplies
            .lock()
            .unwrap()
            .get(mint)
            .cloned()
            .ok_or_else(|| UpstreamError::Rpc(format!("could not find mint {}", mint)))
    }
}

/// DEX price source keyed by mint; unknown mints fail, `None` prices are "no data"
#[derive(Debug, Default)]
pub struct MockDexPrice {
    prices: Mutex<HashMap<String, Option<f64>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDexPrice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, mint: &str, price: Option<f64>) -> Self {
        self.prices.lock().unwrap().insert(mint.to_string(), price);
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DexPriceSource for MockDexPrice {
    async fn price_by_mint(&self, mint: &str) -> PortResult<Option<f64>> {
        self.calls.lock().unwrap().push(mint.to_string());
        self.prices
            .lock()
            .unwrap()
            .get(mint)
            .copied()
            .ok_or_else(|| unavailable("dex"))
    }
}

/// Aggregator with per-symbol quotes and a scripted trending list
///
/// Symbols are matched lowercased. Unknown symbols return `Ok(None)`; symbols
/// registered with `with_failing_quote` return an error.
#[derive(Debug, Default)]
pub struct MockAggregator {
    quotes: Mutex<HashMap<String, Result<Option<PriceQuote>, UpstreamError>>>,
    trending: Mutex<Option<Result<Vec<TrendingEntry>, UpstreamError>>>,
    quote_calls: Arc<Mutex<Vec<String>>>,
    trending_calls: AtomicUsize,
}

impl MockAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(self, symbol: &str, quote: PriceQuote) -> Self {
        self.quotes
            .lock()
            .unwrap()
            .insert(symbol.to_lowercase(), Ok(Some(quote)));
        self
    }

    pub fn with_failing_quote(self, symbol: &str) -> Self {
        self.quotes
            .lock()
            .unwrap()
            .insert(symbol.to_lowercase(), Err(UpstreamError::RateLimited("aggregator".into())));
        self
    }

    pub fn with_trending(self, entries: Vec<TrendingEntry>) -> Self {
        *self.trending.lock().unwrap() = Some(Ok(entries));
        self
    }

    pub fn with_trending_error(self, error: UpstreamError) -> Self {
        *self.trending.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn quote_calls(&self) -> Vec<String> {
        self.quote_calls.lock().unwrap().clone()
    }

    pub fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketAggregatorSource for MockAggregator {
    async fn quote_by_symbol(&self, symbol: &str) -> PortResult<Option<PriceQuote>> {
        self.quote_calls.lock().unwrap().push(symbol.to_string());
        self.quotes
            .lock()
            .unwrap()
            .get(&symbol.to_lowercase())
            .cloned()
            .unwrap_or(Ok(None))
    }

    async fn trending(&self) -> PortResult<Vec<TrendingEntry>> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        self.trending
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Request-API feed with optional latency; unknown symbols fail
#[derive(Debug, Default)]
pub struct MockTokenFeed {
    tokens: Mutex<HashMap<String, CanonicalToken>>,
    trending: Mutex<Vec<TrendingEntry>>,
    latency: Mutex<Duration>,
    failures_before_success: AtomicUsize,
    token_calls: Arc<Mutex<Vec<String>>>,
    trending_calls: AtomicUsize,
}

impl MockTokenFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, symbol: &str, token: CanonicalToken) -> Self {
        self.tokens.lock().unwrap().insert(symbol.to_lowercase(), token);
        self
    }

    pub fn with_trending(self, entries: Vec<TrendingEntry>) -> Self {
        *self.trending.lock().unwrap() = entries;
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = latency;
        self
    }

    /// Fail the next `n` token fetches before answering normally
    pub fn with_transient_failures(self, n: usize) -> Self {
        self.failures_before_success.store(n, Ordering::SeqCst);
        self
    }

    pub fn token_calls(&self) -> Vec<String> {
        self.token_calls.lock().unwrap().clone()
    }

    pub fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFeed for MockTokenFeed {
    async fn fetch_token(&self, symbol: &str) -> Result<CanonicalToken, FeedError> {
        self.token_calls.lock().unwrap().push(symbol.to_string());

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let remaining = self.failures_before_success.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_before_success.store(remaining - 1, Ordering::SeqCst);
            return Err(FeedError::Request("connection reset".to_string()));
        }

        self.tokens
            .lock()
            .unwrap()
            .get(&symbol.to_lowercase())
            .cloned()
            .ok_or_else(|| FeedError::Api("Token data not available".to_string()))
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>, FeedError> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.trending.lock().unwrap().clone())
    }
}
