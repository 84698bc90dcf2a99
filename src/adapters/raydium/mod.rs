//! Raydium Adapter
//!
//! DEX price source keyed by mint address.

mod price;

pub use price::{
    extract_mint_price, RaydiumConfig, RaydiumPriceClient, RaydiumPriceResponse,
    DEFAULT_RAYDIUM_API_URL, DEFAULT_RAYDIUM_PRICE_ENDPOINT,
};
