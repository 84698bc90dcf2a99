//! Client layer for a running tokenscope API
//!
//! - `api`: HTTP implementation of `TokenFeed`
//! - `query_cache` / `query`: cached, retrying reads
//! - `poller`: interval refetch onto a channel
//! - `prefetch`: debounced cache warming

pub mod api;
pub mod poller;
pub mod prefetch;
pub mod query;
pub mod query_cache;
pub mod retry;

pub use api::{TokenApiClient, DEFAULT_API_URL};
pub use poller::{PollTarget, PollUpdate, TokenPoller, DEFAULT_REFETCH_INTERVAL};
pub use prefetch::{Prefetcher, DEFAULT_DEBOUNCE};
pub use query::{QueryClient, QueryClientConfig};
pub use query_cache::{QueryCache, QueryCacheConfig, QueryKey};
pub use retry::RetryPolicy;
