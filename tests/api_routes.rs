//! Request API Integration Tests
//!
//! Exercises the axum router end to end with `oneshot` requests:
//! status codes, JSON bodies, CORS headers and panic conversion.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tokenscope::adapters::http::{create_router, AppState};
use tokenscope::application::{
    DirectoryCache, MetadataResolver, PriceResolver, TokenService, TrendingFetcher,
};
use tokenscope::domain::{PriceQuote, TokenListEntry, TrendingEntry};
use tokenscope::ports::mocks::{MockAggregator, MockDexPrice, MockDirectorySource, MockSupplySource};
use tokenscope::ports::{MarketAggregatorSource, PortResult, UpstreamError};

// ============================================================================
// Test Fixtures
// ============================================================================

const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Aggregator that panics on every call
struct PanickingAggregator;

#[async_trait]
impl MarketAggregatorSource for PanickingAggregator {
    async fn quote_by_symbol(&self, _symbol: &str) -> PortResult<Option<PriceQuote>> {
        panic!("aggregator exploded");
    }

    async fn trending(&self) -> PortResult<Vec<TrendingEntry>> {
        panic!("aggregator exploded");
    }
}

fn router_with(aggregator: Arc<dyn MarketAggregatorSource>) -> Router {
    let directory = Arc::new(DirectoryCache::new(Arc::new(
        MockDirectorySource::new().with_entries(vec![TokenListEntry {
            symbol: "SOL".to_string(),
            mint_address: SOL_MINT.to_string(),
            decimals: 9,
            logo_uri: None,
            name: "Wrapped SOL".to_string(),
        }]),
    )));
    let supply = Arc::new(MockSupplySource::new().with_supply(SOL_MINT, "580000000000000000", 9));
    let dex = Arc::new(MockDexPrice::new().with_price(SOL_MINT, Some(150.0)));

    let metadata = Arc::new(MetadataResolver::new(directory, supply));
    let price = Arc::new(PriceResolver::new(metadata.clone(), dex, aggregator.clone()));
    let trending = Arc::new(TrendingFetcher::new(aggregator));
    let tokens = Arc::new(TokenService::new(trending.clone(), metadata, price));

    create_router(AppState::new(tokens, trending))
}

fn trending_entries() -> Vec<TrendingEntry> {
    serde_json::from_value(json!([
        { "id": "bonk", "name": "Bonk", "symbol": "BONK", "market_cap_rank": 60 },
        { "id": "dogwifcoin", "name": "dogwifhat", "symbol": "WIF", "market_cap_rank": 80 }
    ]))
    .unwrap()
}

fn default_router() -> Router {
    router_with(Arc::new(MockAggregator::new().with_trending(trending_entries())))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// GET /api/token/:symbol
// ============================================================================

#[tokio::test]
async fn test_token_found() {
    let (status, body) = get(default_router(), "/api/token/sol").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "sol");
    assert_eq!(body["price"], 150.0);
    assert_eq!(body["priceChange24h"], 0.0);
    assert_eq!(body["solana"]["decimals"], 9);
    assert_eq!(body["solana"]["supply"], 580_000_000.0);
    assert_eq!(body["solana"]["mintAddress"], SOL_MINT);
}

#[tokio::test]
async fn test_token_not_available() {
    let (status, body) = get(default_router(), "/api/token/UNKNOWNXYZ").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Token data not available" }));
}

#[tokio::test]
async fn test_token_blank_symbol() {
    for uri in ["/api/token/", "/api/token", "/api/token/%20%20"] {
        let (status, body) = get(default_router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body, json!({ "error": "Token symbol is required" }));
    }
}

#[tokio::test]
async fn test_token_handler_panic_becomes_500() {
    let (status, body) = get(router_with(Arc::new(PanickingAggregator)), "/api/token/sol").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch token data" }));
}

// ============================================================================
// GET /api/trending
// ============================================================================

#[tokio::test]
async fn test_trending_success() {
    let (status, body) = get(default_router(), "/api/trending").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][1]["symbol"], "WIF");
}

#[tokio::test]
async fn test_trending_upstream_failure() {
    let aggregator = MockAggregator::new().with_trending_error(UpstreamError::status("coingecko", 503));
    let (status, body) = get(router_with(Arc::new(aggregator)), "/api/trending").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Failed to fetch trending tokens" }));
}

#[tokio::test]
async fn test_trending_panic_becomes_500() {
    let (status, body) = get(router_with(Arc::new(PanickingAggregator)), "/api/trending").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = default_router()
        .oneshot(
            Request::builder()
                .uri("/api/trending")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = default_router()
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
