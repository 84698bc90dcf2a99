//! Prefetcher
//!
//! Warms the query cache ahead of navigation. A prefetch request is skipped
//! when the symbol already has a fresh entry or is being fetched. Otherwise a
//! short debounce timer is armed; arming again before it fires replaces the
//! pending timer. Once the timer fires the symbol is marked in flight until
//! the fetch completes, successfully or not.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::query::QueryClient;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Default)]
struct PrefetchState {
    /// Symbols whose fetch is running
    in_flight: HashSet<String>,
    /// Generation of the live timer per symbol; older timers fire as no-ops
    pending: HashMap<String, u64>,
    next_generation: u64,
}

struct Inner {
    client: Arc<QueryClient>,
    debounce: Duration,
    state: Mutex<PrefetchState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, PrefetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct Prefetcher {
    inner: Arc<Inner>,
}

impl Prefetcher {
    pub fn new(client: Arc<QueryClient>) -> Self {
        Self::with_debounce(client, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(client: Arc<QueryClient>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                debounce,
                state: Mutex::new(PrefetchState::default()),
            }),
        }
    }

    /// Schedule a background fetch for `symbol` unless it is cached or in flight
    pub async fn prefetch(&self, symbol: &str) {
        let key = symbol.to_lowercase();

        if self.inner.client.is_token_fresh(&key).await {
            return;
        }

        let generation = {
            let mut state = self.inner.state();
            if state.in_flight.contains(&key) {
                return;
            }
            state.next_generation += 1;
            let generation = state.next_generation;
            state.pending.insert(key.clone(), generation);
            generation
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            {
                let mut state = inner.state();
                if state.pending.get(&key) != Some(&generation) {
                    return;
                }
                state.pending.remove(&key);
                state.in_flight.insert(key.clone());
            }

            match inner.client.token(&key).await {
                Ok(_) => tracing::debug!(symbol = %key, "Prefetched token data"),
                Err(e) => tracing::warn!(symbol = %key, error = %e, "Prefetch failed"),
            }

            inner.state().in_flight.remove(&key);
        });
    }

    /// Prefetch every symbol in `symbols`
    pub async fn prefetch_many<I, S>(&self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for symbol in symbols {
            self.prefetch(symbol.as_ref()).await;
        }
    }

    pub fn is_prefetching(&self, symbol: &str) -> bool {
        self.inner.state().in_flight.contains(&symbol.to_lowercase())
    }

    pub fn prefetching_count(&self) -> usize {
        self.inner.state().in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::client::query::{sample_token, QueryClientConfig};
    use crate::adapters::client::retry::RetryPolicy;
    use crate::ports::mocks::MockTokenFeed;
    use tokio::time::sleep;

    const DEBOUNCE: Duration = Duration::from_millis(20);

    fn setup(feed: MockTokenFeed) -> (Arc<MockTokenFeed>, Arc<QueryClient>, Prefetcher) {
        let feed = Arc::new(feed);
        let config = QueryClientConfig {
            retry: RetryPolicy { retries: 0, ..Default::default() },
            ..Default::default()
        };
        let client = Arc::new(QueryClient::new(feed.clone(), config));
        let prefetcher = Prefetcher::with_debounce(client.clone(), DEBOUNCE);
        (feed, client, prefetcher)
    }

    #[tokio::test]
    async fn test_prefetch_fills_cache() {
        let (feed, client, prefetcher) = setup(MockTokenFeed::new().with_token("bonk", sample_token("bonk", 0.00002)));

        prefetcher.prefetch("BONK").await;
        sleep(DEBOUNCE * 5).await;

        assert_eq!(feed.token_calls(), vec!["bonk".to_string()]);
        assert!(client.is_token_fresh("bonk").await);
        assert_eq!(prefetcher.prefetching_count(), 0);
    }

    #[tokio::test]
    async fn test_retrigger_replaces_pending_timer() {
        let (feed, _client, prefetcher) = setup(MockTokenFeed::new().with_token("wif", sample_token("wif", 2.0)));

        prefetcher.prefetch("wif").await;
        sleep(DEBOUNCE / 2).await;
        prefetcher.prefetch("WIF").await;
        prefetcher.prefetch("wif").await;
        sleep(DEBOUNCE * 5).await;

        assert_eq!(feed.token_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_in_flight_symbol_is_skipped() {
        let (feed, _client, prefetcher) = setup(
            MockTokenFeed::new()
                .with_token("sol", sample_token("sol", 150.0))
                .with_latency(Duration::from_millis(200)),
        );

        prefetcher.prefetch("sol").await;
        sleep(DEBOUNCE * 3).await;
        assert!(prefetcher.is_prefetching("SOL"));
        assert_eq!(prefetcher.prefetching_count(), 1);

        prefetcher.prefetch("sol").await;
        sleep(Duration::from_millis(300)).await;

        assert!(!prefetcher.is_prefetching("sol"));
        assert_eq!(feed.token_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_is_skipped() {
        let (feed, client, prefetcher) = setup(MockTokenFeed::new().with_token("jup", sample_token("jup", 0.9)));

        client.token("jup").await.unwrap();
        prefetcher.prefetch("jup").await;
        sleep(DEBOUNCE * 3).await;

        assert_eq!(feed.token_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_prefetch_clears_in_flight() {
        let (feed, _client, prefetcher) = setup(MockTokenFeed::new());

        prefetcher.prefetch_many(["pepe", "bonk"]).await;
        sleep(DEBOUNCE * 5).await;

        assert_eq!(prefetcher.prefetching_count(), 0);
        assert_eq!(feed.token_calls().len(), 2);
    }
}
