//! Raydium Price Client
//!
//! USD price by mint from Raydium's v3 API.
//!
//! # Endpoint
//! - `GET {api_url}{price_endpoint}?mints={mint}` (default `https://api-v3.raydium.io/mint/price`)
//!
//! Response: `{ "id": "...", "success": true, "data": { "<mint>": "1.23" | null } }`

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::adapters::upstream::{HttpConfig, UpstreamClient};
use crate::domain::CurrencyValue;
use crate::ports::{DexPriceSource, PortResult};

pub const DEFAULT_RAYDIUM_API_URL: &str = "https://api-v3.raydium.io";
pub const DEFAULT_RAYDIUM_PRICE_ENDPOINT: &str = "/mint/price";

#[derive(Debug, Clone)]
pub struct RaydiumConfig {
    pub api_url: String,
    pub price_endpoint: String,
    pub http: HttpConfig,
}

impl Default for RaydiumConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_RAYDIUM_API_URL.to_string(),
            price_endpoint: DEFAULT_RAYDIUM_PRICE_ENDPOINT.to_string(),
            http: HttpConfig::default(),
        }
    }
}

/// Mint price response
#[derive(Debug, Clone, Deserialize)]
pub struct RaydiumPriceResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<HashMap<String, Option<CurrencyValue>>>,
}

/// Price for `mint`, or `None` when the response does not carry a usable one
pub fn extract_mint_price(response: &RaydiumPriceResponse, mint: &str) -> Option<f64> {
    if !response.success {
        return None;
    }
    let raw = response.data.as_ref()?.get(mint)?.as_ref()?;
    raw.to_f64()
}

#[derive(Debug, Clone)]
pub struct RaydiumPriceClient {
    config: RaydiumConfig,
    client: UpstreamClient,
}

impl RaydiumPriceClient {
    pub fn new() -> PortResult<Self> {
        Self::with_config(RaydiumConfig::default())
    }

    pub fn with_config(config: RaydiumConfig) -> PortResult<Self> {
        let client = UpstreamClient::new("raydium", config.http.clone())?;
        Ok(Self { config, client })
    }

    fn price_url(&self) -> String {
        format!("{}{}", self.config.api_url, self.config.price_endpoint)
    }
}

#[async_trait]
impl DexPriceSource for RaydiumPriceClient {
    async fn price_by_mint(&self, mint: &str) -> PortResult<Option<f64>> {
        tracing::debug!(mint, "Fetching Raydium price");
        let response: RaydiumPriceResponse = self
            .client
            .get_json(&self.price_url(), &[("mints", mint)])
            .await?;
        tracing::debug!(mint, ?response, "Raydium response");

        let price = extract_mint_price(&response, mint);
        match price {
            Some(price) => tracing::info!(mint, price, "Raydium price found"),
            None => tracing::warn!(mint, "No price data found for mint"),
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::upstream::test_server;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    fn response(value: Value) -> RaydiumPriceResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_string_price() {
        let r = response(json!({ "id": "x", "success": true, "data": { BONK: "0.0000231" } }));
        assert_eq!(extract_mint_price(&r, BONK), Some(0.0000231));
    }

    #[test]
    fn test_extract_numeric_price() {
        let r = response(json!({ "success": true, "data": { BONK: 1.5 } }));
        assert_eq!(extract_mint_price(&r, BONK), Some(1.5));
    }

    #[test]
    fn test_extract_unusable_prices() {
        let failed = response(json!({ "success": false, "data": { BONK: "1.0" } }));
        let null = response(json!({ "success": true, "data": { BONK: null } }));
        let missing = response(json!({ "success": true, "data": {} }));
        let garbage = response(json!({ "success": true, "data": { BONK: "n/a" } }));
        let no_data = response(json!({ "success": true }));

        for r in [failed, null, missing, garbage, no_data] {
            assert_eq!(extract_mint_price(&r, BONK), None);
        }
    }

    #[tokio::test]
    async fn test_price_by_mint_sends_mint_query() {
        let base = test_server::spawn(Router::new().route(
            "/mint/price",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let mint = params.get("mints").cloned().unwrap_or_default();
                Json(json!({ "id": "1", "success": true, "data": { mint: "2.5" } }))
            }),
        ))
        .await;
        let client = RaydiumPriceClient::with_config(RaydiumConfig {
            api_url: base,
            price_endpoint: "/mint/price".to_string(),
            http: HttpConfig {
                timeout: Duration::from_secs(5),
                max_attempts: 1,
                retry_base_delay_ms: 1,
            },
        })
        .unwrap();

        assert_eq!(client.price_by_mint(BONK).await.unwrap(), Some(2.5));
    }
}
