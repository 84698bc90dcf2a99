//! Price Resolver
//!
//! Ordered fallback chain, first success wins:
//! 1. mint address from the directory (skip to 3 when unknown)
//! 2. DEX price by mint, topped up with the aggregator's market fields by symbol
//! 3. aggregator quote by symbol

use std::sync::Arc;

use super::metadata::MetadataResolver;
use crate::domain::PriceQuote;
use crate::ports::{DexPriceSource, MarketAggregatorSource};

pub struct PriceResolver {
    metadata: Arc<MetadataResolver>,
    dex: Arc<dyn DexPriceSource>,
    aggregator: Arc<dyn MarketAggregatorSource>,
}

impl PriceResolver {
    pub fn new(
        metadata: Arc<MetadataResolver>,
        dex: Arc<dyn DexPriceSource>,
        aggregator: Arc<dyn MarketAggregatorSource>,
    ) -> Self {
        Self { metadata, dex, aggregator }
    }

    pub async fn resolve_price(&self, symbol: &str) -> Option<PriceQuote> {
        tracing::debug!(symbol, "Resolving token price");

        match self.metadata.find_mint_address(symbol).await {
            Some(mint) => {
                if let Some(price) = self.dex_price(&mint).await {
                    tracing::info!(symbol, price, "DEX price found, fetching market fields");
                    let market = self.aggregator_quote(symbol).await;
                    return Some(PriceQuote::price_only(price).with_market_fields(market.as_ref()));
                }
                tracing::warn!(symbol, "DEX price unavailable, falling back to aggregator");
            }
            None => tracing::warn!(symbol, "No mint address found, trying aggregator"),
        }

        match self.aggregator_quote(symbol).await {
            Some(quote) => {
                tracing::info!(symbol, price = quote.price, "Aggregator fallback successful");
                Some(quote)
            }
            None => {
                tracing::warn!(symbol, "All price sources failed");
                None
            }
        }
    }

    async fn dex_price(&self, mint: &str) -> Option<f64> {
        match self.dex.price_by_mint(mint).await {
            Ok(Some(price)) if price.is_finite() => Some(price),
            Ok(_) => {
                tracing::warn!(mint, "No price data found on DEX");
                None
            }
            Err(e) => {
                tracing::error!(mint, error = %e, "Error fetching DEX price");
                None
            }
        }
    }

    async fn aggregator_quote(&self, symbol: &str) -> Option<PriceQuote> {
        match self.aggregator.quote_by_symbol(symbol).await {
            Ok(Some(quote)) => Some(quote),
            Ok(None) => {
                tracing::warn!(symbol, "Token not found in aggregator");
                None
            }
            Err(e) => {
                tracing::error!(symbol, error = %e, "Error fetching aggregator quote");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::DirectoryCache;
    use crate::domain::TokenListEntry;
    use crate::ports::market_data::MockDexPriceSource;
    use crate::ports::mocks::{MockAggregator, MockDexPrice, MockDirectorySource, MockSupplySource};

    const JUP_MINT: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";

    fn metadata() -> Arc<MetadataResolver> {
        let source = MockDirectorySource::new().with_entries(vec![TokenListEntry {
            symbol: "JUP".to_string(),
            mint_address: JUP_MINT.to_string(),
            decimals: 6,
            logo_uri: None,
            name: "Jupiter".to_string(),
        }]);
        let directory = Arc::new(DirectoryCache::new(Arc::new(source)));
        Arc::new(MetadataResolver::new(directory, Arc::new(MockSupplySource::new())))
    }

    fn full_quote(price: f64) -> PriceQuote {
        PriceQuote {
            price,
            market_cap: Some(1_200_000_000.0),
            volume_24h: Some(45_000_000.0),
            price_change_percent_24h: Some(-2.5),
        }
    }

    #[tokio::test]
    async fn test_dex_price_with_aggregator_fields() {
        let dex = Arc::new(MockDexPrice::new().with_price(JUP_MINT, Some(0.91)));
        let aggregator = Arc::new(MockAggregator::new().with_quote("jup", full_quote(0.89)));
        let resolver = PriceResolver::new(metadata(), dex.clone(), aggregator.clone());

        let quote = resolver.resolve_price("JUP").await.unwrap();
        assert_eq!(quote.price, 0.91);
        assert_eq!(quote.market_cap, Some(1_200_000_000.0));
        assert_eq!(quote.price_change_percent_24h, Some(-2.5));
        assert_eq!(dex.get_calls(), vec![JUP_MINT.to_string()]);
        assert_eq!(aggregator.quote_calls(), vec!["JUP".to_string()]);
    }

    #[tokio::test]
    async fn test_dex_price_survives_aggregator_failure() {
        let dex = Arc::new(MockDexPrice::new().with_price(JUP_MINT, Some(0.91)));
        let aggregator = Arc::new(MockAggregator::new().with_failing_quote("jup"));
        let resolver = PriceResolver::new(metadata(), dex, aggregator);

        let quote = resolver.resolve_price("jup").await.unwrap();
        assert_eq!(quote, PriceQuote::price_only(0.91));
    }

    #[tokio::test]
    async fn test_null_dex_price_falls_back_to_aggregator() {
        let dex = Arc::new(MockDexPrice::new().with_price(JUP_MINT, None));
        let aggregator = Arc::new(MockAggregator::new().with_quote("jup", full_quote(0.89)));
        let resolver = PriceResolver::new(metadata(), dex, aggregator.clone());

        let quote = resolver.resolve_price("jup").await.unwrap();
        assert_eq!(quote, full_quote(0.89));
        assert_eq!(aggregator.quote_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_mint_skips_dex() {
        let mut dex = MockDexPriceSource::new();
        dex.expect_price_by_mint().times(0);
        let aggregator = Arc::new(MockAggregator::new().with_quote("wif", full_quote(2.1)));
        let resolver = PriceResolver::new(metadata(), Arc::new(dex), aggregator);

        let quote = resolver.resolve_price("WIF").await.unwrap();
        assert_eq!(quote.price, 2.1);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_absent() {
        let dex = Arc::new(MockDexPrice::new());
        let aggregator = Arc::new(MockAggregator::new().with_failing_quote("jup"));
        let resolver = PriceResolver::new(metadata(), dex, aggregator);

        assert!(resolver.resolve_price("jup").await.is_none());
        assert!(resolver.resolve_price("nothing").await.is_none());
    }
}
