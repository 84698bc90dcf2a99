//! CoinGecko Client
//!
//! Market aggregator source: simple-price quotes by coin id and the trending
//! search feed.
//!
//! # Endpoints Used
//! - Simple price: `GET {api_url}/simple/price?ids={id}&vs_currencies=usd&...`
//! - Trending: `GET {api_url}/search/trending`
//!
//! The public API rate limits aggressively. Simple-price requests are spaced
//! by a fixed delay and a 429 is reported as "no quote" rather than an error.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::upstream::{HttpConfig, UpstreamClient};
use crate::domain::{PriceQuote, TrendingEntry};
use crate::ports::{MarketAggregatorSource, PortResult, UpstreamError};

pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TRENDING_ENDPOINT: &str = "/search/trending";
pub const DEFAULT_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub api_url: String,
    pub trending_endpoint: String,
    pub simple_price_endpoint: String,
    /// Delay taken before every simple-price request
    pub request_spacing: Duration,
    pub http: HttpConfig,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COINGECKO_API_URL.to_string(),
            trending_endpoint: DEFAULT_TRENDING_ENDPOINT.to_string(),
            simple_price_endpoint: DEFAULT_SIMPLE_PRICE_ENDPOINT.to_string(),
            request_spacing: Duration::from_millis(100),
            http: HttpConfig::default(),
        }
    }
}

/// One coin in a simple-price response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimplePrice {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
}

pub type SimplePriceResponse = HashMap<String, SimplePrice>;

/// Quote for `coin_id`; missing numbers are filled with 0
pub fn quote_from_simple_price(response: &SimplePriceResponse, coin_id: &str) -> Option<PriceQuote> {
    let entry = response.get(coin_id)?;
    let or_zero = |v: Option<f64>| Some(v.filter(|n| n.is_finite()).unwrap_or(0.0));

    Some(PriceQuote {
        price: entry.usd.filter(|n| n.is_finite()).unwrap_or(0.0),
        market_cap: or_zero(entry.usd_market_cap),
        volume_24h: or_zero(entry.usd_24h_vol),
        price_change_percent_24h: or_zero(entry.usd_24h_change),
    })
}

/// Unwrap `{ coins: [{ item: {...} }] }` into trending entries
///
/// A missing or non-array `coins`, or an element without a valid `item`,
/// rejects the whole response.
pub fn unwrap_trending_envelope(body: Value) -> PortResult<Vec<TrendingEntry>> {
    let coins = match body.get("coins") {
        Some(Value::Array(coins)) => coins,
        _ => {
            return Err(UpstreamError::Malformed(
                "Invalid response format from CoinGecko API".to_string(),
            ))
        }
    };

    coins
        .iter()
        .enumerate()
        .map(|(i, coin)| {
            let item = coin
                .get("item")
                .ok_or_else(|| UpstreamError::Malformed(format!("trending coin {} has no item", i)))?;
            serde_json::from_value(item.clone())
                .map_err(|e| UpstreamError::Malformed(format!("trending coin {}: {}", i, e)))
        })
        .collect()
}

/// CoinGecko API client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: UpstreamClient,
}

impl CoinGeckoClient {
    pub fn new() -> PortResult<Self> {
        Self::with_config(CoinGeckoConfig::default())
    }

    pub fn with_config(config: CoinGeckoConfig) -> PortResult<Self> {
        let client = UpstreamClient::new("coingecko", config.http.clone())?;
        Ok(Self { config, client })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.api_url, endpoint)
    }
}

#[async_trait]
impl MarketAggregatorSource for CoinGeckoClient {
    async fn quote_by_symbol(&self, symbol: &str) -> PortResult<Option<PriceQuote>> {
        tokio::time::sleep(self.config.request_spacing).await;

        let coin_id = symbol.to_lowercase();
        let query = [
            ("ids", coin_id.as_str()),
            ("vs_currencies", "usd"),
            ("include_24hr_change", "true"),
            ("include_market_cap", "true"),
            ("include_24hr_vol", "true"),
        ];

        let url = self.url(&self.config.simple_price_endpoint);
        let response: SimplePriceResponse = match self.client.get_json(&url, &query).await {
            Ok(response) => response,
            Err(UpstreamError::RateLimited(_)) => {
                tracing::warn!(symbol, "CoinGecko API rate limited");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let quote = quote_from_simple_price(&response, &coin_id);
        if quote.is_none() {
            tracing::warn!(symbol, "Token not found in CoinGecko");
        }
        Ok(quote)
    }

    async fn trending(&self) -> PortResult<Vec<TrendingEntry>> {
        let body: Value = self
            .client
            .get_json(&self.url(&self.config.trending_endpoint), &[])
            .await?;
        unwrap_trending_envelope(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::upstream::test_server;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn config(api_url: String) -> CoinGeckoConfig {
        CoinGeckoConfig {
            api_url,
            request_spacing: Duration::ZERO,
            http: HttpConfig {
                timeout: Duration::from_secs(5),
                max_attempts: 1,
                retry_base_delay_ms: 1,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_config_default() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.api_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.trending_endpoint, "/search/trending");
        assert_eq!(config.simple_price_endpoint, "/simple/price");
        assert_eq!(config.request_spacing, Duration::from_millis(100));
    }

    #[test]
    fn test_quote_fills_missing_fields_with_zero() {
        let response: SimplePriceResponse =
            serde_json::from_value(json!({ "bonk": { "usd": 0.0000231, "usd_24h_change": -3.1 } })).unwrap();

        let quote = quote_from_simple_price(&response, "bonk").unwrap();
        assert_eq!(quote.price, 0.0000231);
        assert_eq!(quote.market_cap, Some(0.0));
        assert_eq!(quote.volume_24h, Some(0.0));
        assert_eq!(quote.price_change_percent_24h, Some(-3.1));
        assert!(quote_from_simple_price(&response, "wif").is_none());
    }

    #[test]
    fn test_unwrap_trending_envelope() {
        let body = json!({
            "coins": [
                { "item": { "id": "pepe", "name": "Pepe", "symbol": "PEPE", "score": 0 } },
                { "item": { "id": "bonk", "name": "Bonk", "symbol": "BONK", "score": 1 } }
            ],
            "exchanges": [],
            "nfts": []
        });

        let entries = unwrap_trending_envelope(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].id, "bonk");
    }

    #[test]
    fn test_unwrap_trending_rejects_bad_shapes() {
        for body in [
            json!({}),
            json!({ "coins": "nope" }),
            json!({ "coins": [{ "not_item": {} }] }),
            json!({ "coins": [{ "item": { "id": "x" } }] }),
        ] {
            assert!(matches!(unwrap_trending_envelope(body), Err(UpstreamError::Malformed(_))));
        }
    }

    #[tokio::test]
    async fn test_quote_by_symbol_uses_lowercase_id() {
        let base = test_server::spawn(Router::new().route(
            "/simple/price",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("vs_currencies").map(String::as_str), Some("usd"));
                let id = params.get("ids").cloned().unwrap_or_default();
                Json(json!({ id: { "usd": 150.0, "usd_market_cap": 7.0e10 } }))
            }),
        ))
        .await;
        let client = CoinGeckoClient::with_config(config(base)).unwrap();

        let quote = client.quote_by_symbol("SOLANA").await.unwrap().unwrap();
        assert_eq!(quote.price, 150.0);
        assert_eq!(quote.market_cap, Some(7.0e10));
    }

    #[tokio::test]
    async fn test_rate_limit_is_absent() {
        let base = test_server::spawn(Router::new().route(
            "/simple/price",
            get(|| async { StatusCode::TOO_MANY_REQUESTS }),
        ))
        .await;
        let client = CoinGeckoClient::with_config(config(base)).unwrap();

        assert_eq!(client.quote_by_symbol("sol").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_trending_server_error_propagates() {
        let base = test_server::spawn(Router::new().route(
            "/search/trending",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let client = CoinGeckoClient::with_config(config(base)).unwrap();

        let err = client.trending().await.unwrap_err();
        assert_eq!(err, UpstreamError::status("coingecko", 500));
    }
}
