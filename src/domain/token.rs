//! Token Types
//!
//! Records produced by the directory, RPC and price sources, and the merged
//! canonical record served over the API.

use serde::{Deserialize, Serialize};

/// Length of a decoded Solana public key
const PUBKEY_LEN: usize = 32;

/// One entry of the token directory (symbol -> mint mapping)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenListEntry {
    pub symbol: String,
    pub mint_address: String,
    pub decimals: u8,
    pub logo_uri: Option<String>,
    pub name: String,
}

impl TokenListEntry {
    /// Case-insensitive exact symbol match
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }
}

/// Raw mint supply as reported by `getTokenSupply`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSupply {
    /// Supply in base units
    pub amount: String,
    pub decimals: u8,
}

impl TokenSupply {
    /// Supply scaled by decimals; 0 when the raw amount does not parse
    pub fn ui_amount(&self) -> f64 {
        match self.amount.parse::<u128>() {
            Ok(raw) => raw as f64 / 10f64.powi(self.decimals as i32),
            Err(_) => 0.0,
        }
    }
}

/// Directory entry enriched with on-chain supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: f64,
    pub mint_address: Option<String>,
    pub logo_uri: Option<String>,
}

impl TokenMetadata {
    /// Metadata built from the directory alone (RPC unavailable)
    pub fn from_directory(entry: &TokenListEntry) -> Self {
        Self {
            name: entry.name.clone(),
            symbol: entry.symbol.clone(),
            decimals: entry.decimals,
            supply: 0.0,
            mint_address: Some(entry.mint_address.clone()),
            logo_uri: entry.logo_uri.clone(),
        }
    }

    /// Metadata with live supply; RPC decimals win over directory decimals
    pub fn with_supply(entry: &TokenListEntry, supply: &TokenSupply) -> Self {
        Self {
            decimals: supply.decimals,
            supply: supply.ui_amount(),
            ..Self::from_directory(entry)
        }
    }
}

/// Per-request price snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub price_change_percent_24h: Option<f64>,
}

impl PriceQuote {
    /// Quote carrying only a price
    pub fn price_only(price: f64) -> Self {
        Self {
            price,
            market_cap: None,
            volume_24h: None,
            price_change_percent_24h: None,
        }
    }

    /// Keep `self.price`, take the supplementary fields from another quote
    pub fn with_market_fields(self, other: Option<&PriceQuote>) -> Self {
        match other {
            Some(other) => Self {
                market_cap: other.market_cap,
                volume_24h: other.volume_24h,
                price_change_percent_24h: other.price_change_percent_24h,
                ..self
            },
            None => self,
        }
    }
}

/// On-chain section of the canonical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaDetails {
    pub name: String,
    pub symbol: String,
    pub supply: f64,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint_address: Option<String>,
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Merged token record returned by `GET /api/token/{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalToken {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percent_24h: f64,
    pub solana: SolanaDetails,
}

/// Whether `address` decodes to a 32-byte base58 public key
pub fn is_valid_mint_address(address: &str) -> bool {
    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == PUBKEY_LEN,
        Err(_) => false,
    }
}
