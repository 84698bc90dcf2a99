//! Trending Fetcher
//!
//! Thin wrapper over the aggregator's trending feed. There is no second source
//! for trending data, so failures are returned to the caller.

use std::sync::Arc;

use crate::domain::TrendingEntry;
use crate::ports::{MarketAggregatorSource, PortResult};

pub struct TrendingFetcher {
    aggregator: Arc<dyn MarketAggregatorSource>,
}

impl TrendingFetcher {
    pub fn new(aggregator: Arc<dyn MarketAggregatorSource>) -> Self {
        Self { aggregator }
    }

    /// Full trending list, replaced on every call
    pub async fn get_trending(&self) -> PortResult<Vec<TrendingEntry>> {
        tracing::info!("Fetching trending tokens");
        match self.aggregator.trending().await {
            Ok(tokens) => {
                tracing::info!(count = tokens.len(), "Fetched trending tokens");
                Ok(tokens)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching trending tokens");
                Err(e)
            }
        }
    }

    /// Trending entry whose symbol matches case-insensitively
    pub async fn find_by_symbol(&self, symbol: &str) -> PortResult<Option<TrendingEntry>> {
        let tokens = self.get_trending().await?;
        Ok(tokens.into_iter().find(|t| t.matches_symbol(symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockAggregator;
    use crate::ports::UpstreamError;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn entry(id: &str, symbol: &str) -> TrendingEntry {
        serde_json::from_value(json!({ "id": id, "name": id, "symbol": symbol })).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_symbol_case_insensitive() {
        let aggregator = Arc::new(
            MockAggregator::new().with_trending(vec![entry("pepe", "PEPE"), entry("dogwifcoin", "WIF")]),
        );
        let fetcher = TrendingFetcher::new(aggregator.clone());

        let found = assert_ok!(fetcher.find_by_symbol("wif").await);
        assert_eq!(found.map(|t| t.id), Some("dogwifcoin".to_string()));
        assert_eq!(assert_ok!(fetcher.find_by_symbol("btc").await), None);
        assert_eq!(aggregator.trending_calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let aggregator = Arc::new(
            MockAggregator::new().with_trending_error(UpstreamError::Malformed("no coins".into())),
        );
        let fetcher = TrendingFetcher::new(aggregator);

        let err = assert_err!(fetcher.get_trending().await);
        assert_eq!(err, UpstreamError::Malformed("no coins".into()));
    }
}
