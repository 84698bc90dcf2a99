//! Trending Token Types
//!
//! Shape of one entry in the market aggregator's trending feed. Field names
//! follow the upstream payload so entries pass through the API unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::numeric::{non_zero, CurrencyValue};

/// One ranked token from the trending feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    #[serde(default)]
    pub coin_id: Option<u64>,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price_btc: Option<f64>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub data: Option<TrendingData>,
}

/// Market snapshot embedded in a trending entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingData {
    #[serde(default)]
    pub price: Option<CurrencyValue>,
    #[serde(default)]
    pub price_btc: Option<String>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    pub market_cap: Option<CurrencyValue>,
    #[serde(default)]
    pub market_cap_btc: Option<String>,
    #[serde(default)]
    pub total_volume: Option<CurrencyValue>,
    #[serde(default)]
    pub total_volume_btc: Option<String>,
    #[serde(default)]
    pub sparkline: Option<String>,
    #[serde(default)]
    pub content: Option<TrendingContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl TrendingEntry {
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }

    /// USD price; zero counts as missing
    pub fn price_usd(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|d| d.price.as_ref())
            .and_then(CurrencyValue::to_f64)
            .and_then(non_zero)
    }

    /// Market cap, when present and parseable
    pub fn market_cap_usd(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|d| d.market_cap.as_ref())
            .filter(|v| !v.is_blank())
            .and_then(CurrencyValue::to_f64)
    }

    /// 24h volume, when present and parseable
    pub fn volume_usd(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|d| d.total_volume.as_ref())
            .filter(|v| !v.is_blank())
            .and_then(CurrencyValue::to_f64)
    }

    /// 24h USD change in percent; zero counts as missing
    pub fn price_change_pct_24h(&self) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|d| d.price_change_percentage_24h.as_ref())
            .and_then(|changes| changes.get("usd").copied().flatten())
            .and_then(non_zero)
    }

    /// Thumbnail URL, if non-empty
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumb.as_deref().filter(|t| !t.is_empty())
    }
}
