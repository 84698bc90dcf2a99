//! Domain Layer - Core token data logic for tokenscope
//!
//! Pure types and functions with no I/O. All external interactions happen
//! through the ports layer.
//!
//! - `token`: directory entries, supply, metadata, quotes and the canonical record
//! - `trending`: trending feed entries
//! - `numeric`: currency-string parsing
//! - `directory`: directory snapshot and freshness rule
//! - `reconcile`: three-source merge
//! - `format`: display helpers

pub mod token;
pub mod trending;
pub mod numeric;
pub mod directory;
pub mod reconcile;
pub mod format;

pub use token::{
    is_valid_mint_address, CanonicalToken, PriceQuote, SolanaDetails, TokenListEntry,
    TokenMetadata, TokenSupply,
};
pub use trending::{TrendingContent, TrendingData, TrendingEntry};
pub use numeric::{parse_currency, CurrencyValue};
pub use directory::{is_fresh, CachedDirectory, DEFAULT_DIRECTORY_TTL};
pub use reconcile::{reconcile, SourceInputs, DEFAULT_DECIMALS};
pub use format::{
    format_market_cap, format_number_with_commas, format_percentage, format_price,
    format_price_change, format_supply, format_volume, Percentage,
};
