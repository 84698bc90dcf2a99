//! Solana JSON-RPC Types
//!
//! Response shapes for the handful of RPC methods used here.

use serde::Deserialize;

/// Standard JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// `{ context, value }` wrapper used by most account methods
#[derive(Debug, Clone, Deserialize)]
pub struct RpcValue<T> {
    pub value: T,
}

/// Token amount as returned by `getTokenSupply` and `getTokenAccountBalance`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    /// Raw amount in base units
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

/// One entry of `getTokenAccountsByOwner`
#[derive(Debug, Clone, Deserialize)]
pub struct KeyedAccount {
    pub pubkey: String,
}
