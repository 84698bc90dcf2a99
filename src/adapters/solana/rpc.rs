//! Solana RPC Client
//!
//! Raw JSON-RPC over reqwest for the token reads tokenscope needs:
//! - `getTokenSupply` for live mint supply
//! - `getTokenAccountsByOwner` + `getTokenAccountBalance` for wallet balances

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::{KeyedAccount, RpcResponse, RpcValue, UiTokenAmount};
use crate::adapters::upstream::{HttpConfig, UpstreamClient};
use crate::domain::{is_valid_mint_address, TokenSupply};
use crate::ports::{PortResult, SupplySource, UpstreamError};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Configuration for the Solana RPC client
#[derive(Debug, Clone)]
pub struct SolanaRpcConfig {
    /// Solana RPC endpoint URL
    pub rpc_url: String,
    pub http: HttpConfig,
}

impl Default for SolanaRpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl SolanaRpcConfig {
    /// Create config with a custom RPC URL
    pub fn with_rpc_url(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }
}

/// Unwrap a JSON-RPC envelope into its result
pub fn into_result<T>(response: RpcResponse<T>) -> PortResult<T> {
    if let Some(error) = response.error {
        return Err(UpstreamError::Rpc(format!("{} (code {})", error.message, error.code)));
    }
    response
        .result
        .ok_or_else(|| UpstreamError::Malformed("RPC response has neither result nor error".to_string()))
}

fn ensure_pubkey(label: &str, address: &str) -> PortResult<()> {
    if is_valid_mint_address(address) {
        Ok(())
    } else {
        Err(UpstreamError::InvalidInput(format!("invalid {}: {}", label, address)))
    }
}

#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    config: SolanaRpcConfig,
    client: UpstreamClient,
}

impl SolanaRpcClient {
    pub fn new() -> PortResult<Self> {
        Self::with_config(SolanaRpcConfig::default())
    }

    pub fn with_rpc_url(rpc_url: impl Into<String>) -> PortResult<Self> {
        Self::with_config(SolanaRpcConfig::with_rpc_url(rpc_url))
    }

    pub fn with_config(config: SolanaRpcConfig) -> PortResult<Self> {
        let client = UpstreamClient::new("solana-rpc", config.http.clone())?;
        Ok(Self { config, client })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> PortResult<T> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: RpcResponse<T> = self.client.post_json(&self.config.rpc_url, &request_body).await?;
        into_result(response)
    }

    /// UI balance of `mint` held by `wallet`; 0 when the wallet has no token account
    pub async fn token_balance(&self, wallet: &str, mint: &str) -> PortResult<f64> {
        ensure_pubkey("wallet address", wallet)?;
        ensure_pubkey("mint address", mint)?;

        let accounts: RpcValue<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([wallet, { "mint": mint }, { "encoding": "jsonParsed" }]),
            )
            .await?;

        let Some(account) = accounts.value.first() else {
            tracing::debug!(wallet, mint, "No token accounts for wallet");
            return Ok(0.0);
        };

        let balance: RpcValue<UiTokenAmount> = self
            .call("getTokenAccountBalance", json!([account.pubkey]))
            .await?;
        Ok(balance.value.ui_amount.unwrap_or(0.0))
    }
}

#[async_trait]
impl SupplySource for SolanaRpcClient {
    async fn token_supply(&self, mint: &str) -> PortResult<TokenSupply> {
        let supply: RpcValue<UiTokenAmount> = self.call("getTokenSupply", json!([mint])).await?;
        Ok(TokenSupply {
            amount: supply.value.amount,
            decimals: supply.value.decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::upstream::test_server;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::time::Duration;

    const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    /// Fake RPC node answering by method name
    async fn rpc_node(accounts: Value) -> SolanaRpcClient {
        let router = Router::new().route(
            "/",
            post(move |Json(req): Json<Value>| {
                let accounts = accounts.clone();
                async move {
                    let result = match req["method"].as_str() {
                        Some("getTokenSupply") => json!({
                            "context": { "slot": 1 },
                            "value": { "amount": "5034943353413", "decimals": 6, "uiAmount": 5034943.353413, "uiAmountString": "5034943.353413" }
                        }),
                        Some("getTokenAccountsByOwner") => json!({ "context": { "slot": 1 }, "value": accounts }),
                        Some("getTokenAccountBalance") => json!({
                            "context": { "slot": 1 },
                            "value": { "amount": "1250000", "decimals": 6, "uiAmount": 1.25, "uiAmountString": "1.25" }
                        }),
                        _ => {
                            return Json(json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32601, "message": "Method not found" } }))
                        }
                    };
                    Json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
                }
            }),
        );
        let base = test_server::spawn(router).await;
        SolanaRpcClient::with_config(SolanaRpcConfig {
            rpc_url: format!("{}/", base),
            http: HttpConfig {
                timeout: Duration::from_secs(5),
                max_attempts: 1,
                retry_base_delay_ms: 1,
            },
        })
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = SolanaRpcConfig::default();
        assert_eq!(config.rpc_url, "https://api.mainnet-beta.solana.com");
        let custom = SolanaRpcConfig::with_rpc_url("https://api.devnet.solana.com");
        assert_eq!(custom.rpc_url, "https://api.devnet.solana.com");
    }

    #[test]
    fn test_into_result_error() {
        let response: RpcResponse<Value> = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": 1, "error": { "code": -32602, "message": "Invalid param" }
        }))
        .unwrap();
        let err = into_result(response).unwrap_err();
        assert_eq!(err, UpstreamError::Rpc("Invalid param (code -32602)".to_string()));
    }

    #[tokio::test]
    async fn test_token_supply() {
        let client = rpc_node(json!([])).await;
        let supply = client.token_supply(USDC).await.unwrap();
        assert_eq!(supply.amount, "5034943353413");
        assert_eq!(supply.decimals, 6);
        approx::assert_relative_eq!(supply.ui_amount(), 5_034_943.353413, epsilon = 1e-6);
    }

    #[tokio::test]
    async fn test_token_balance_with_account() {
        let client = rpc_node(json!([{ "pubkey": "3emsAVdmGKERbHjmGfQ6oZ1e35dkf5iYcS6U4CPKFVaa", "account": {} }])).await;
        assert_eq!(client.token_balance(WALLET, USDC).await.unwrap(), 1.25);
    }

    #[tokio::test]
    async fn test_token_balance_without_accounts_is_zero() {
        let client = rpc_node(json!([])).await;
        assert_eq!(client.token_balance(WALLET, USDC).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_token_balance_rejects_bad_addresses() {
        let client = rpc_node(json!([])).await;
        let err = client.token_balance("not a wallet", USDC).await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidInput(_)));
    }
}
