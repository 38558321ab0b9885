//! RPC Error Types
//!
//! Failures surfaced by the retry controller once it stops retrying.

use thiserror::Error;

/// Errors that can occur when calling the Solana JSON-RPC endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Connection-level failure or timeout, after linear backoff
    #[error("Network error: {0}")]
    Network(String),

    /// Still rate limited after every attempt
    #[error("Error: Rate limit exceeded after {attempts} retries")]
    RateLimitExceeded { attempts: u32 },

    /// Non-200, non-429 HTTP status
    #[error("Error: RPC returned status code {status}")]
    ServerError { status: u16 },

    /// Explicit JSON-RPC error object
    #[error("Error: {message}")]
    Protocol { code: i64, message: String },

    /// The `result` member did not have the expected shape
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl RpcError {
    /// Whether this error class is retried by the controller
    pub fn is_retryable(&self) -> bool {
        matches!(self, RpcError::Network(_) | RpcError::RateLimitExceeded { .. })
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::InvalidResponse(err.to_string())
    }
}
