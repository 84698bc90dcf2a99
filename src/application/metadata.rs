//! Metadata Resolver
//!
//! Symbol -> directory entry -> live supply. A symbol missing from the
//! directory resolves to `None`; an RPC failure degrades to directory data
//! with zero supply.

use std::sync::Arc;

use super::directory_cache::DirectoryCache;
use crate::domain::{is_valid_mint_address, TokenListEntry, TokenMetadata};
use crate::ports::{SupplySource, UpstreamError};

pub struct MetadataResolver {
    directory: Arc<DirectoryCache>,
    supply: Arc<dyn SupplySource>,
}

impl MetadataResolver {
    pub fn new(directory: Arc<DirectoryCache>, supply: Arc<dyn SupplySource>) -> Self {
        Self { directory, supply }
    }

    /// Directory entry for a symbol; directory failures are logged and read as "not found"
    async fn lookup(&self, symbol: &str) -> Option<TokenListEntry> {
        match self.directory.find(symbol).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(symbol, error = %e, "Error looking up token in directory");
                None
            }
        }
    }

    /// Mint address for a symbol, if the directory knows it
    pub async fn find_mint_address(&self, symbol: &str) -> Option<String> {
        match self.lookup(symbol).await {
            Some(entry) => {
                tracing::debug!(symbol, address = %entry.mint_address, "Found mint address");
                Some(entry.mint_address)
            }
            None => {
                tracing::debug!(symbol, "No mint address found");
                None
            }
        }
    }

    /// Directory metadata enriched with on-chain supply
    pub async fn resolve_metadata(&self, symbol: &str) -> Option<TokenMetadata> {
        tracing::debug!(symbol, "Getting token metadata");

        let Some(entry) = self.lookup(symbol).await else {
            tracing::debug!(symbol, "Token not found in directory");
            return None;
        };
        tracing::info!(name = %entry.name, symbol = %entry.symbol, "Found token in directory");

        match self.fetch_supply(&entry).await {
            Ok(metadata) => {
                tracing::info!(symbol, "Fetched on-chain supply");
                Some(metadata)
            }
            Err(e) => {
                tracing::warn!(symbol, error = %e, "RPC failed, using directory data without supply");
                Some(TokenMetadata::from_directory(&entry))
            }
        }
    }

    async fn fetch_supply(&self, entry: &TokenListEntry) -> Result<TokenMetadata, UpstreamError> {
        if !is_valid_mint_address(&entry.mint_address) {
            return Err(UpstreamError::InvalidInput(format!(
                "invalid mint address: {}",
                entry.mint_address
            )));
        }
        let supply = self.supply.token_supply(&entry.mint_address).await?;
        Ok(TokenMetadata::with_supply(entry, &supply))
    }
}
