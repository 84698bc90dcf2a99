//! Source Reconciliation
//!
//! Merges the trending entry, the resolved price quote and the resolved token
//! metadata into one canonical record. Precedence per field:
//!
//! | field                          | order                                   |
//! |--------------------------------|-----------------------------------------|
//! | price, 24h change %            | trending (non-zero) -> quote -> 0       |
//! | market cap, 24h volume         | trending (parseable) -> quote -> 0      |
//! | name, symbol                   | trending -> metadata -> input uppercased |
//! | solana.name, solana.symbol     | metadata -> trending -> input uppercased |
//! | solana.decimals                | metadata -> 9                           |
//! | solana.supply                  | metadata -> 0                           |
//! | solana.logoURI                 | metadata logo -> trending thumb         |
//! | id                             | trending id -> input lowercased         |
//!
//! `price_change_24h` (absolute) is always 0; no source reports it.

use super::token::{CanonicalToken, PriceQuote, SolanaDetails, TokenMetadata};
use super::trending::TrendingEntry;

/// Decimals assumed when no metadata is available (SPL default)
pub const DEFAULT_DECIMALS: u8 = 9;

/// The three per-request lookups feeding the merge
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceInputs<'a> {
    pub trending: Option<&'a TrendingEntry>,
    pub quote: Option<&'a PriceQuote>,
    pub metadata: Option<&'a TokenMetadata>,
}

impl<'a> SourceInputs<'a> {
    /// True when at least one lookup produced something
    pub fn has_any_signal(&self) -> bool {
        self.trending.is_some() || self.quote.is_some() || self.metadata.is_some()
    }
}

/// Build the canonical record for `symbol`, or `None` when every source came up empty
pub fn reconcile(symbol: &str, inputs: SourceInputs<'_>) -> Option<CanonicalToken> {
    if !inputs.has_any_signal() {
        return None;
    }

    let SourceInputs { trending, quote, metadata } = inputs;
    let upper = symbol.to_uppercase();

    let price = trending
        .and_then(TrendingEntry::price_usd)
        .or_else(|| quote.map(|q| q.price))
        .unwrap_or(0.0);
    let market_cap = trending
        .and_then(TrendingEntry::market_cap_usd)
        .or_else(|| quote.and_then(|q| q.market_cap))
        .unwrap_or(0.0);
    let volume_24h = trending
        .and_then(TrendingEntry::volume_usd)
        .or_else(|| quote.and_then(|q| q.volume_24h))
        .unwrap_or(0.0);
    let price_change_percent_24h = trending
        .and_then(TrendingEntry::price_change_pct_24h)
        .or_else(|| quote.and_then(|q| q.price_change_percent_24h))
        .unwrap_or(0.0);

    let trending_name = trending.map(|t| t.name.as_str()).filter(|s| !s.is_empty());
    let trending_symbol = trending.map(|t| t.symbol.as_str()).filter(|s| !s.is_empty());
    let metadata_name = metadata.map(|m| m.name.as_str()).filter(|s| !s.is_empty());
    let metadata_symbol = metadata.map(|m| m.symbol.as_str()).filter(|s| !s.is_empty());

    let solana = SolanaDetails {
        name: first_of(&[metadata_name, trending_name], &upper),
        symbol: first_of(&[metadata_symbol, trending_symbol], &upper),
        supply: metadata.map(|m| m.supply).unwrap_or(0.0),
        decimals: metadata.map(|m| m.decimals).unwrap_or(DEFAULT_DECIMALS),
        mint_address: metadata.and_then(|m| m.mint_address.clone()),
        logo_uri: metadata
            .and_then(|m| m.logo_uri.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| trending.and_then(TrendingEntry::thumbnail))
            .map(str::to_string),
    };

    Some(CanonicalToken {
        id: trending
            .map(|t| t.id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| symbol.to_lowercase()),
        name: first_of(&[trending_name, metadata_name], &upper),
        symbol: first_of(&[trending_symbol, metadata_symbol], &upper),
        price,
        market_cap,
        volume_24h,
        price_change_24h: 0.0,
        price_change_percent_24h,
        solana,
    })
}

fn first_of(candidates: &[Option<&str>], fallback: &str) -> String {
    candidates
        .iter()
        .flatten()
        .next()
        .copied()
        .unwrap_or(fallback)
        .to_string()
}
