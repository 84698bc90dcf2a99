//! Request API client
//!
//! `TokenFeed` over HTTP, for the CLI and other consumers of a running
//! tokenscope server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{CanonicalToken, TrendingEntry};
use crate::ports::{FeedError, TokenFeed};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

const TOKEN_FETCH_FAILED: &str = "Failed to fetch token data";
const TRENDING_FETCH_FAILED: &str = "Failed to fetch trending tokens";

#[derive(Debug, Deserialize)]
struct TrendingBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<TrendingEntry>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret a token response body; an `error` field wins over token fields
pub fn parse_token_body(body: Value) -> Result<CanonicalToken, FeedError> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        if !message.is_empty() {
            return Err(FeedError::Api(message.to_string()));
        }
    }
    serde_json::from_value(body).map_err(|e| FeedError::Request(format!("invalid token payload: {}", e)))
}

/// Interpret a trending response body
pub fn parse_trending_body(body: Value) -> Result<Vec<TrendingEntry>, FeedError> {
    let body: TrendingBody = serde_json::from_value(body)
        .map_err(|e| FeedError::Request(format!("invalid trending payload: {}", e)))?;
    if !body.success {
        return Err(FeedError::Api(
            body.error.unwrap_or_else(|| TRENDING_FETCH_FAILED.to_string()),
        ));
    }
    Ok(body.data)
}

#[derive(Debug, Clone)]
pub struct TokenApiClient {
    base_url: String,
    http: Client,
}

impl TokenApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Request(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, failure: &str) -> Result<Value, FeedError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "API returned an error status");
            return Err(FeedError::Api(failure.to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))
    }
}

#[async_trait]
impl TokenFeed for TokenApiClient {
    async fn fetch_token(&self, symbol: &str) -> Result<CanonicalToken, FeedError> {
        let body = self.get(&format!("/api/token/{}", symbol), TOKEN_FETCH_FAILED).await?;
        parse_token_body(body)
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>, FeedError> {
        let body = self.get("/api/trending", TRENDING_FETCH_FAILED).await?;
        parse_trending_body(body)
    }
}
