//! Common error types for all ports

use thiserror::Error;

/// Common result type for upstream port operations
pub type PortResult<T> = Result<T, UpstreamError>;

/// Failure talking to an external collaborator
///
/// Unreachable and malformed upstreams are reported the same way; resolvers
/// turn both into "no data".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Network/transport failure (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limited by {0}")]
    RateLimited(String),

    /// Response did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// JSON-RPC level error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl UpstreamError {
    pub fn status(source_name: impl Into<String>, status: u16) -> Self {
        UpstreamError::Status {
            source_name: source_name.into(),
            status,
        }
    }
}

/// Failure fetching from the request API (client side)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Request never produced a usable response
    #[error("Request failed: {0}")]
    Request(String),

    /// API answered with an error message
    #[error("{0}")]
    Api(String),
}
