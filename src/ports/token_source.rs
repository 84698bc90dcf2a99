//! Token directory and on-chain supply ports

use async_trait::async_trait;

use super::models::PortResult;
use crate::domain::{TokenListEntry, TokenSupply};

/// Source of the full token directory (symbol -> mint mapping)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenDirectorySource: Send + Sync {
    /// Fetch the complete directory; partial results are never returned
    async fn fetch_directory(&self) -> PortResult<Vec<TokenListEntry>>;
}

/// On-chain mint supply lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplySource: Send + Sync {
    /// Raw supply and decimals for a mint
    async fn token_supply(&self, mint: &str) -> PortResult<TokenSupply>;
}
