pub mod directory_cache;
pub mod metadata;
pub mod price;
pub mod token_service;
pub mod trending;

pub use directory_cache::{DirectoryCache, DirectoryError};
pub use metadata::MetadataResolver;
pub use price::PriceResolver;
pub use token_service::TokenService;
pub use trending::TrendingFetcher;
