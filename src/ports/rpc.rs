use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Classified result of a single JSON-RPC call.
///
/// Transports never raise for expected conditions; the retry controller
/// branches on the tag instead.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    /// HTTP 200 with a `result` member (may be `null`)
    Success(Value),
    /// HTTP 429 or an RPC error object with code 429
    RateLimited,
    /// Any other non-200 HTTP status
    ServerError { status: u16 },
    /// HTTP 200 carrying an explicit RPC error object
    RpcError { code: i64, message: String },
    /// Connection failure, timeout or unreadable body
    NetworkFailure(String),
}

impl RpcOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RpcOutcome::Success(_))
    }
}

/// JSON-RPC transport port
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue one call and classify its outcome
    async fn call(&self, method: &str, params: Value) -> RpcOutcome;
}

/// Suspension used for pacing and backoff.
///
/// Implementations must only suspend the calling task.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_is_success() {
        assert!(RpcOutcome::Success(json!(null)).is_success());
        assert!(!RpcOutcome::RateLimited.is_success());
        assert!(!RpcOutcome::ServerError { status: 503 }.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_clock() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(4)).await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
