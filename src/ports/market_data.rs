//! Market data ports - DEX pricing and the market aggregator

use async_trait::async_trait;

use super::models::PortResult;
use crate::domain::{PriceQuote, TrendingEntry};

/// DEX price lookups by mint address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DexPriceSource: Send + Sync {
    /// USD price for a mint; `Ok(None)` when the DEX has no usable price
    async fn price_by_mint(&self, mint: &str) -> PortResult<Option<f64>>;
}

/// Market aggregator: quotes by symbol and the trending feed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketAggregatorSource: Send + Sync {
    /// Full quote for a symbol; `Ok(None)` when the aggregator does not know it
    async fn quote_by_symbol(&self, symbol: &str) -> PortResult<Option<PriceQuote>>;

    /// Current trending list, in rank order
    async fn trending(&self) -> PortResult<Vec<TrendingEntry>>;
}
