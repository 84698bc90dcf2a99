//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits and the outer surfaces:
//! - Upstream: shared HTTP client with timeout and retry/backoff
//! - Jupiter: token list (directory source)
//! - Solana: JSON-RPC supply and wallet balances
//! - Raydium: DEX prices by mint
//! - CoinGecko: quotes and the trending feed
//! - HTTP: the request API (axum)
//! - Client: polling/prefetching consumer of the request API
//! - CLI: Command-line interface handlers

pub mod upstream;
pub mod jupiter;
pub mod solana;
pub mod raydium;
pub mod coingecko;
pub mod http;
pub mod client;
pub mod cli;

pub use upstream::{HttpConfig, UpstreamClient};
pub use jupiter::JupiterTokenList;
pub use solana::SolanaRpcClient;
pub use raydium::RaydiumPriceClient;
pub use coingecko::CoinGeckoClient;
pub use http::{create_router, AppState};
pub use client::{Prefetcher, QueryClient, TokenApiClient, TokenPoller};
pub use cli::CliApp;
