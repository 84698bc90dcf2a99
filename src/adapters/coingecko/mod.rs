//! CoinGecko Adapter
//!
//! Market aggregator source: symbol quotes and the trending feed.

mod client;

pub use client::{
    quote_from_simple_price, unwrap_trending_envelope, CoinGeckoClient, CoinGeckoConfig,
    SimplePrice, SimplePriceResponse, DEFAULT_COINGECKO_API_URL, DEFAULT_SIMPLE_PRICE_ENDPOINT,
    DEFAULT_TRENDING_ENDPOINT,
};
