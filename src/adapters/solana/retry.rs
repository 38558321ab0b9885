//! Retry/Backoff Controller
//!
//! Wraps an [`RpcTransport`] with a bounded number of attempts:
//! - rate limited: sleep `retry_delay * 2^attempt`, retry
//! - network failure: sleep `retry_delay * (attempt + 1)`, retry
//! - server error / RPC error object: fail immediately
//!
//! Paced calls additionally sleep `base_delay` before every attempt.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use super::error::RpcError;
use crate::ports::rpc::{RpcOutcome, RpcTransport, Sleeper, TokioSleeper};

/// Retry tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call
    pub max_retries: u32,
    /// Pause before each attempt of a paced call
    pub base_delay: Duration,
    /// Backoff unit
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Exponential delay after a rate-limited attempt (0-based)
    pub fn rate_limit_backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Linear delay after a failed connection (0-based attempt)
    pub fn network_backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt.saturating_add(1))
    }
}

/// Whether a call pre-emptively waits before each attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Immediate,
    Paced,
}

/// Retrying front for the shared RPC transport
#[derive(Clone)]
pub struct RetryController {
    transport: Arc<dyn RpcTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for RetryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryController")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RetryController {
    /// Controller sleeping on the tokio timer
    pub fn new(transport: Arc<dyn RpcTransport>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(transport, Arc::new(TokioSleeper), policy)
    }

    pub fn with_sleeper(
        transport: Arc<dyn RpcTransport>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Call `method` until it succeeds, hits a non-retryable outcome, or
    /// runs out of attempts. Returns the `result` member on success.
    pub async fn call(&self, method: &str, params: Value, pacing: Pacing) -> Result<Value, RpcError> {
        let max = self.policy.max_retries.max(1);
        let mut last_error = RpcError::Network("No attempts made".into());

        for attempt in 0..max {
            let is_last = attempt + 1 >= max;

            if pacing == Pacing::Paced {
                self.sleeper.sleep(self.policy.base_delay).await;
            }

            match self.transport.call(method, params.clone()).await {
                RpcOutcome::Success(result) => return Ok(result),

                RpcOutcome::RateLimited => {
                    last_error = RpcError::RateLimitExceeded { attempts: max };
                    if !is_last {
                        let backoff = self.policy.rate_limit_backoff(attempt);
                        warn!(
                            "{} rate limited, backing off for {:?} (attempt {}/{})",
                            method,
                            backoff,
                            attempt + 1,
                            max
                        );
                        self.sleeper.sleep(backoff).await;
                    }
                }

                RpcOutcome::NetworkFailure(reason) => {
                    last_error = RpcError::Network(reason);
                    if !is_last {
                        let backoff = self.policy.network_backoff(attempt);
                        warn!(
                            "{} network failure, retrying in {:?} (attempt {}/{})",
                            method,
                            backoff,
                            attempt + 1,
                            max
                        );
                        self.sleeper.sleep(backoff).await;
                    }
                }

                RpcOutcome::ServerError { status } => {
                    return Err(RpcError::ServerError { status });
                }

                RpcOutcome::RpcError { code, message } => {
                    return Err(RpcError::Protocol { code, message });
                }
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::{MockRpc, RecordingSleeper};
    use serde_json::json;

    fn controller(rpc: MockRpc, sleeper: RecordingSleeper, max_retries: u32) -> RetryController {
        RetryController::with_sleeper(
            Arc::new(rpc),
            Arc::new(sleeper),
            RetryPolicy {
                max_retries,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_backoff_schedules() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_backoff(0), Duration::from_secs(2));
        assert_eq!(policy.rate_limit_backoff(1), Duration::from_secs(4));
        assert_eq!(policy.rate_limit_backoff(2), Duration::from_secs(8));
        assert_eq!(policy.network_backoff(0), Duration::from_secs(2));
        assert_eq!(policy.network_backoff(2), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_success_first_try_does_not_sleep() {
        let rpc = MockRpc::new().with_response("getAccountInfo", RpcOutcome::Success(json!({"value": null})));
        let sleeper = RecordingSleeper::new();
        let ctl = controller(rpc.clone(), sleeper.clone(), 3);

        let result = ctl.call("getAccountInfo", json!(["Mint"]), Pacing::Immediate).await;
        assert_eq!(result.unwrap(), json!({"value": null}));
        assert!(sleeper.delays().is_empty());
        assert_eq!(rpc.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_then_success_backs_off_exponentially() {
        let max = 4;
        let mut rpc = MockRpc::new();
        for _ in 0..max - 1 {
            rpc = rpc.with_response("getAccountInfo", RpcOutcome::RateLimited);
        }
        let rpc = rpc.with_response("getAccountInfo", RpcOutcome::Success(json!("ok")));
        let sleeper = RecordingSleeper::new();
        let ctl = controller(rpc.clone(), sleeper.clone(), max);

        let result = ctl.call("getAccountInfo", json!(["Mint"]), Pacing::Immediate).await;
        assert_eq!(result.unwrap(), json!("ok"));
        assert_eq!(rpc.calls().len(), max as usize);

        let delays = sleeper.delays();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_always_rate_limited_fails_after_max_attempts() {
        let rpc = MockRpc::new().with_fallback("getAccountInfo", RpcOutcome::RateLimited);
        let sleeper = RecordingSleeper::new();
        let ctl = controller(rpc.clone(), sleeper.clone(), 3);

        let err = ctl
            .call("getAccountInfo", json!(["Mint"]), Pacing::Immediate)
            .await
            .unwrap_err();

        assert_eq!(err, RpcError::RateLimitExceeded { attempts: 3 });
        assert_eq!(rpc.calls().len(), 3);
        // No sleep after the final attempt
        assert_eq!(sleeper.delays().len(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_backs_off_linearly() {
        let rpc = MockRpc::new()
            .with_response("getTransaction", RpcOutcome::NetworkFailure("connection reset".into()))
            .with_response("getTransaction", RpcOutcome::NetworkFailure("timed out".into()))
            .with_response("getTransaction", RpcOutcome::Success(json!(null)));
        let sleeper = RecordingSleeper::new();
        let ctl = controller(rpc, sleeper.clone(), 3);

        let result = ctl.call("getTransaction", json!(["sig"]), Pacing::Immediate).await;
        assert!(result.is_ok());
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_network_failure_exhausted() {
        let rpc = MockRpc::new().with_fallback("getTransaction", RpcOutcome::NetworkFailure("refused".into()));
        let ctl = controller(rpc.clone(), RecordingSleeper::new(), 3);

        let err = ctl
            .call("getTransaction", json!(["sig"]), Pacing::Immediate)
            .await
            .unwrap_err();
        assert_eq!(err, RpcError::Network("refused".into()));
        assert_eq!(rpc.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_server_error_not_retried() {
        let rpc = MockRpc::new().with_fallback("getAccountInfo", RpcOutcome::ServerError { status: 503 });
        let sleeper = RecordingSleeper::new();
        let ctl = controller(rpc.clone(), sleeper.clone(), 3);

        let err = ctl
            .call("getAccountInfo", json!(["Mint"]), Pacing::Immediate)
            .await
            .unwrap_err();
        assert_eq!(err, RpcError::ServerError { status: 503 });
        assert_eq!(rpc.calls().len(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_protocol_error_not_retried() {
        let rpc = MockRpc::new().with_fallback(
            "getAccountInfo",
            RpcOutcome::RpcError {
                code: -32602,
                message: "Invalid param: WrongSize".into(),
            },
        );
        let ctl = controller(rpc.clone(), RecordingSleeper::new(), 3);

        let err = ctl
            .call("getAccountInfo", json!(["bad"]), Pacing::Immediate)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: Invalid param: WrongSize");
        assert_eq!(rpc.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_paced_call_sleeps_base_delay_before_each_attempt() {
        let rpc = MockRpc::new()
            .with_response("getAccountInfo", RpcOutcome::RateLimited)
            .with_response("getAccountInfo", RpcOutcome::RateLimited)
            .with_response("getAccountInfo", RpcOutcome::Success(json!(1)));
        let sleeper = RecordingSleeper::new();
        let ctl = RetryController::with_sleeper(
            Arc::new(rpc),
            Arc::new(sleeper.clone()),
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(500),
                retry_delay: Duration::from_secs(2),
            },
        );

        ctl.call("getAccountInfo", json!(["Pda"]), Pacing::Paced).await.unwrap();
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_millis(500),
                Duration::from_secs(2),
                Duration::from_millis(500),
                Duration::from_secs(4),
                Duration::from_millis(500),
            ]
        );
    }

    #[tokio::test]
    async fn test_paced_call_exhausted_pauses_before_every_attempt() {
        let rpc = MockRpc::new().with_fallback("getAccountInfo", RpcOutcome::RateLimited);
        let sleeper = RecordingSleeper::new();
        let ctl = RetryController::with_sleeper(
            Arc::new(rpc.clone()),
            Arc::new(sleeper.clone()),
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(500),
                retry_delay: Duration::from_secs(2),
            },
        );

        let err = ctl
            .call("getAccountInfo", json!(["Pda"]), Pacing::Paced)
            .await
            .unwrap_err();
        assert_eq!(err, RpcError::RateLimitExceeded { attempts: 3 });
        assert_eq!(rpc.calls().len(), 3);
        let paced = sleeper
            .delays()
            .into_iter()
            .filter(|d| *d == Duration::from_millis(500))
            .count();
        assert_eq!(paced, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_only_suspends_calling_task() {
        let rpc = MockRpc::new()
            .with_response_for("getAccountInfo", "Slow", RpcOutcome::RateLimited)
            .with_response_for("getAccountInfo", "Slow", RpcOutcome::Success(json!("slow")))
            .with_response_for("getAccountInfo", "Fast", RpcOutcome::Success(json!("fast")));
        let ctl = RetryController::new(Arc::new(rpc), RetryPolicy::default());

        let slow = {
            let ctl = ctl.clone();
            tokio::spawn(async move {
                ctl.call("getAccountInfo", json!(["Slow"]), Pacing::Immediate).await
            })
        };
        let start = tokio::time::Instant::now();
        let fast = ctl.call("getAccountInfo", json!(["Fast"]), Pacing::Immediate).await;

        assert_eq!(fast.unwrap(), json!("fast"));
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(slow.await.unwrap().unwrap(), json!("slow"));
    }
}
