//! Solana RPC Adapter
//!
//! HTTP JSON-RPC transport, outcome classification and the retry/backoff
//! controller every other adapter calls through.

pub mod error;
pub mod retry;
pub mod rpc;

pub use error::RpcError;
pub use retry::{Pacing, RetryController, RetryPolicy};
pub use rpc::HttpRpcClient;
