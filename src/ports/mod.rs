//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - The token directory and on-chain supply (Jupiter list, Solana RPC)
//! - Market data (Raydium prices, CoinGecko quotes and trending feed)
//! - Time, so cache expiry is testable
//! - The request API as seen by polling/prefetching clients

pub mod token_source;
pub mod market_data;
pub mod clock;
pub mod feed;
pub mod models;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use token_source::{SupplySource, TokenDirectorySource};
pub use market_data::{DexPriceSource, MarketAggregatorSource};
pub use clock::{Clock, SystemClock};
pub use feed::TokenFeed;
pub use models::{FeedError, PortResult, UpstreamError};
