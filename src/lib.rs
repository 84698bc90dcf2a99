//! tokenscope - Solana token data aggregation library
//!
//! Merges a token directory, on-chain supply, DEX prices and market
//! aggregator data into one canonical record per symbol.
//!
//! # Modules
//!
//! - `domain`: Core types and pure logic (CanonicalToken, reconcile, formatting)
//! - `ports`: Trait abstractions (TokenDirectorySource, SupplySource, DexPriceSource, ...)
//! - `adapters`: External implementations (Jupiter, Solana RPC, Raydium, CoinGecko, HTTP API, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Directory cache, resolvers and the token service

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
