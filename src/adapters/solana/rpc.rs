use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::RpcError;
use crate::ports::rpc::{RpcOutcome, RpcTransport};

/// JSON-RPC error code some providers use for rate limiting
pub const RATE_LIMIT_CODE: i64 = 429;

/// JSON-RPC response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcEnvelope {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Classify a decoded HTTP 200 body
pub fn classify_envelope(envelope: JsonRpcEnvelope) -> RpcOutcome {
    match envelope.error {
        Some(err) if err.code == RATE_LIMIT_CODE => RpcOutcome::RateLimited,
        Some(err) => RpcOutcome::RpcError {
            code: err.code,
            message: err.message,
        },
        None => RpcOutcome::Success(envelope.result.unwrap_or(Value::Null)),
    }
}

/// Classify an HTTP status that is not 200
pub fn classify_status(status: StatusCode) -> Option<RpcOutcome> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(RpcOutcome::RateLimited)
    } else if status != StatusCode::OK {
        Some(RpcOutcome::ServerError {
            status: status.as_u16(),
        })
    } else {
        None
    }
}

/// Solana JSON-RPC client over HTTP POST.
///
/// One connection pool is shared by every task holding a clone.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    url: String,
    http: Client,
}

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

impl HttpRpcClient {
    /// Create a client with a total timeout per call
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            http,
        })
    }

    /// Get the configured RPC URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(method: &str, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        })
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn call(&self, method: &str, params: Value) -> RpcOutcome {
        let body = Self::request_body(method, params);

        let response = match self.http.post(&self.url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => return RpcOutcome::NetworkFailure(e.to_string()),
        };

        if let Some(outcome) = classify_status(response.status()) {
            debug!("{} -> HTTP {}", method, response.status());
            return outcome;
        }

        match response.json::<JsonRpcEnvelope>().await {
            Ok(envelope) => classify_envelope(envelope),
            Err(e) => RpcOutcome::NetworkFailure(format!("Failed to read response: {}", e)),
        }
    }
}
