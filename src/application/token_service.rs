//! Token Service
//!
//! Runs the three lookups for a symbol (trending, metadata, price) one after
//! another and merges them into a canonical record. A failed trending lookup
//! is logged and ignored; the resolvers already report failures as "absent".

use std::sync::Arc;

use super::metadata::MetadataResolver;
use super::price::PriceResolver;
use super::trending::TrendingFetcher;
use crate::domain::{reconcile, CanonicalToken, SourceInputs, TrendingEntry};

pub struct TokenService {
    trending: Arc<TrendingFetcher>,
    metadata: Arc<MetadataResolver>,
    price: Arc<PriceResolver>,
}

impl TokenService {
    pub fn new(
        trending: Arc<TrendingFetcher>,
        metadata: Arc<MetadataResolver>,
        price: Arc<PriceResolver>,
    ) -> Self {
        Self { trending, metadata, price }
    }

    /// Canonical record for `symbol`, or `None` when no source knows it
    pub async fn reconcile(&self, symbol: &str) -> Option<CanonicalToken> {
        let trending = self.trending_match(symbol).await;
        let metadata = self.metadata.resolve_metadata(symbol).await;
        tracing::debug!(symbol, ?metadata, "Metadata lookup finished");
        let quote = self.price.resolve_price(symbol).await;
        tracing::debug!(symbol, ?quote, "Price lookup finished");

        let inputs = SourceInputs {
            trending: trending.as_ref(),
            quote: quote.as_ref(),
            metadata: metadata.as_ref(),
        };

        match reconcile(symbol, inputs) {
            Some(token) => {
                tracing::info!(symbol, id = %token.id, price = token.price, "Returning combined token data");
                Some(token)
            }
            None => {
                tracing::warn!(symbol, "No data available for token");
                None
            }
        }
    }

    async fn trending_match(&self, symbol: &str) -> Option<TrendingEntry> {
        match self.trending.find_by_symbol(symbol).await {
            Ok(Some(entry)) => {
                tracing::info!(symbol, id = %entry.id, "Found token in trending data");
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "Could not fetch trending data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::DirectoryCache;
    use crate::domain::{PriceQuote, TokenListEntry};
    use crate::ports::mocks::{MockAggregator, MockDexPrice, MockDirectorySource, MockSupplySource};
    use crate::ports::UpstreamError;
    use serde_json::json;

    const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

    fn service(aggregator: MockAggregator, dex: MockDexPrice) -> TokenService {
        let directory = Arc::new(DirectoryCache::new(Arc::new(
            MockDirectorySource::new().with_entries(vec![TokenListEntry {
                symbol: "SOL".to_string(),
                mint_address: SOL_MINT.to_string(),
                decimals: 9,
                logo_uri: Some("https://example.com/sol.png".to_string()),
                name: "Wrapped SOL".to_string(),
            }]),
        )));
        let supply = MockSupplySource::new().with_supply(SOL_MINT, "580000000000000000", 9);
        let aggregator: Arc<MockAggregator> = Arc::new(aggregator);

        let metadata = Arc::new(MetadataResolver::new(directory, Arc::new(supply)));
        let price = Arc::new(PriceResolver::new(metadata.clone(), Arc::new(dex), aggregator.clone()));
        let trending = Arc::new(TrendingFetcher::new(aggregator));
        TokenService::new(trending, metadata, price)
    }

    #[tokio::test]
    async fn test_sol_with_trending_match() {
        let trending = serde_json::from_value(json!({
            "id": "solana",
            "name": "Solana",
            "symbol": "SOL",
            "market_cap_rank": 3,
            "data": { "price": 150.0, "price_change_percentage_24h": { "usd": 5.2 } }
        }))
        .unwrap();
        let svc = service(
            MockAggregator::new().with_trending(vec![trending]),
            MockDexPrice::new().with_price(SOL_MINT, Some(149.5)),
        );

        let token = svc.reconcile("SOL").await.unwrap();
        assert_eq!(token.id, "solana");
        assert_eq!(token.price, 150.0);
        assert_eq!(token.price_change_percent_24h, 5.2);
        assert_eq!(token.solana.supply, 580_000_000.0);
        assert_eq!(token.solana.mint_address.as_deref(), Some(SOL_MINT));
    }

    #[tokio::test]
    async fn test_trending_outage_is_ignored() {
        let svc = service(
            MockAggregator::new()
                .with_trending_error(UpstreamError::status("coingecko", 503))
                .with_quote("sol", PriceQuote::price_only(148.0)),
            MockDexPrice::new(),
        );

        let token = svc.reconcile("sol").await.unwrap();
        assert_eq!(token.id, "sol");
        assert_eq!(token.price, 148.0);
        assert_eq!(token.name, "Wrapped SOL");
    }

    #[tokio::test]
    async fn test_unknown_everywhere_is_absent() {
        let svc = service(MockAggregator::new(), MockDexPrice::new());
        assert!(svc.reconcile("UNKNOWNXYZ").await.is_none());
    }
}
