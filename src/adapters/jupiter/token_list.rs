//! Jupiter Token List Fetcher
//!
//! Downloads the full Jupiter token list, the directory used to map symbols to
//! mint addresses.
//!
//! # Endpoint
//! - `https://token.jup.ag/all` (configurable)
//!
//! The body is either a bare array of tokens or an object with a `tokens`
//! array. Any other shape is a malformed response, reported as a fetch
//! failure so the directory cache keeps its previous snapshot. Individual
//! entries that do not have the expected fields are skipped.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::upstream::{HttpConfig, UpstreamClient};
use crate::domain::TokenListEntry;
use crate::ports::{PortResult, TokenDirectorySource, UpstreamError};

pub const DEFAULT_TOKEN_LIST_URL: &str = "https://token.jup.ag/all";

/// Configuration for the Jupiter token list fetcher
#[derive(Debug, Clone)]
pub struct JupiterTokenListConfig {
    /// Full URL of the token list
    pub url: String,
    pub http: HttpConfig,
}

impl Default for JupiterTokenListConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TOKEN_LIST_URL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

/// Token as it appears in the Jupiter list
#[derive(Debug, Clone, Deserialize)]
pub struct JupiterToken {
    /// Token mint address
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
    /// Tags (e.g., "verified", "strict", "community")
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<JupiterToken> for TokenListEntry {
    fn from(token: JupiterToken) -> Self {
        TokenListEntry {
            symbol: token.symbol,
            mint_address: token.address,
            decimals: token.decimals,
            logo_uri: token.logo_uri.filter(|uri| !uri.is_empty()),
            name: token.name,
        }
    }
}

/// Pull the token array out of either accepted body shape
pub fn parse_token_list(body: Value) -> PortResult<Vec<TokenListEntry>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tokens") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(UpstreamError::Malformed(
                    "Jupiter token list has no tokens array".to_string(),
                ))
            }
        },
        _ => {
            return Err(UpstreamError::Malformed(
                "Jupiter token list is not an array".to_string(),
            ))
        }
    };

    let total = items.len();
    let entries: Vec<TokenListEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<JupiterToken>(item).ok())
        .map(TokenListEntry::from)
        .collect();

    if entries.len() < total {
        tracing::debug!(skipped = total - entries.len(), "Skipped malformed token list entries");
    }
    Ok(entries)
}

/// Jupiter token list client
#[derive(Debug, Clone)]
pub struct JupiterTokenList {
    config: JupiterTokenListConfig,
    client: UpstreamClient,
}

impl JupiterTokenList {
    /// Create a new fetcher with default configuration
    pub fn new() -> PortResult<Self> {
        Self::with_config(JupiterTokenListConfig::default())
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: JupiterTokenListConfig) -> PortResult<Self> {
        let client = UpstreamClient::new("jupiter", config.http.clone())?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TokenDirectorySource for JupiterTokenList {
    async fn fetch_directory(&self) -> PortResult<Vec<TokenListEntry>> {
        let body: Value = self.client.get_json(&self.config.url, &[]).await?;
        let entries = parse_token_list(body)?;
        tracing::info!(count = entries.len(), "Fetched tokens from Jupiter");
        Ok(entries)
    }
}
