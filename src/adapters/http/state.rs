use std::sync::Arc;

use crate::application::{TokenService, TrendingFetcher};

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub trending: Arc<TrendingFetcher>,
}

impl AppState {
    pub fn new(tokens: Arc<TokenService>, trending: Arc<TrendingFetcher>) -> Self {
        Self { tokens, trending }
    }
}
