pub mod rpc;
pub mod types;

pub use rpc::{SolanaRpcClient, SolanaRpcConfig, DEFAULT_RPC_URL};
