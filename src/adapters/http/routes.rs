//! Request API routes
//!
//! - `GET /api/token/:symbol` - reconciled token record
//! - `GET /api/trending` - trending feed
//!
//! Each route carries its own panic handler so a panicking handler still
//! answers with the route's usual 500 body.

use std::any::Any;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;

pub const SYMBOL_REQUIRED: &str = "Token symbol is required";
pub const TOKEN_NOT_AVAILABLE: &str = "Token data not available";
pub const TOKEN_FETCH_FAILED: &str = "Failed to fetch token data";
pub const TRENDING_FETCH_FAILED: &str = "Failed to fetch trending tokens";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/token/:symbol",
            get(get_token).layer(CatchPanicLayer::custom(token_panic)),
        )
        .route("/api/token", get(missing_symbol))
        .route("/api/token/", get(missing_symbol))
        .route(
            "/api/trending",
            get(get_trending).layer(CatchPanicLayer::custom(trending_panic)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_token(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return missing_symbol().await;
    }

    tracing::info!(symbol, "Token request");
    match state.tokens.reconcile(symbol).await {
        Some(token) => Json(token).into_response(),
        None => error_response(StatusCode::NOT_FOUND, TOKEN_NOT_AVAILABLE),
    }
}

async fn missing_symbol() -> Response {
    error_response(StatusCode::BAD_REQUEST, SYMBOL_REQUIRED)
}

async fn get_trending(State(state): State<AppState>) -> Response {
    match state.trending.get_trending().await {
        Ok(tokens) => Json(json!({ "success": true, "data": tokens })).into_response(),
        Err(_) => trending_failure(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn trending_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": TRENDING_FETCH_FAILED })),
    )
        .into_response()
}

fn panic_message(err: &(dyn Any + Send)) -> &str {
    if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    }
}

fn token_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = panic_message(err.as_ref()), "Token handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, TOKEN_FETCH_FAILED)
}

fn trending_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = panic_message(err.as_ref()), "Trending handler panicked");
    trending_failure()
}
