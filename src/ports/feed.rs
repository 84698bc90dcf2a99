//! Client-side port onto the request API

use async_trait::async_trait;

use super::models::FeedError;
use crate::domain::{CanonicalToken, TrendingEntry};

/// Read access to the tokenscope request API
#[async_trait]
pub trait TokenFeed: Send + Sync {
    /// `GET /api/token/{symbol}`
    async fn fetch_token(&self, symbol: &str) -> Result<CanonicalToken, FeedError>;

    /// `GET /api/trending`
    async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>, FeedError>;
}
