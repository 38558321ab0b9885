//! Scripted test doubles for the RPC and sleep ports.
//!
//! Responses are queued per method, optionally narrowed to a first
//! parameter (`getAccountInfo` for one address). Unscripted calls fall back
//! to a per-method default, then to a network failure.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::rpc::{RpcOutcome, RpcTransport, Sleeper};

/// A recorded RPC call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

impl RecordedCall {
    /// First positional parameter as a string, if any
    pub fn first_param(&self) -> Option<&str> {
        self.params.get(0).and_then(Value::as_str)
    }
}

/// Mock RPC transport that records calls and replays scripted outcomes
#[derive(Debug, Default, Clone)]
pub struct MockRpc {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<RpcOutcome>>>>,
    fallbacks: Arc<Mutex<HashMap<String, RpcOutcome>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for any call to `method`
    pub fn with_response(self, method: &str, outcome: RpcOutcome) -> Self {
        self.push(method.to_string(), outcome);
        self
    }

    /// Queue an outcome for `method` called with `first_param`
    pub fn with_response_for(self, method: &str, first_param: &str, outcome: RpcOutcome) -> Self {
        self.push(script_key(method, Some(first_param)), outcome);
        self
    }

    /// Outcome returned once the queues for `method` are drained
    pub fn with_fallback(self, method: &str, outcome: RpcOutcome) -> Self {
        self.fallbacks
            .lock()
            .unwrap()
            .insert(method.to_string(), outcome);
        self
    }

    /// Delay every call whose first parameter is `first_param`
    pub fn with_delay_for(self, first_param: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(first_param.to_string(), delay);
        self
    }

    /// All recorded calls, in call order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls to one method
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn push(&self, key: String, outcome: RpcOutcome) {
        self.queued
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back(outcome);
    }

    fn next_outcome(&self, method: &str, first_param: Option<&str>) -> RpcOutcome {
        let mut queued = self.queued.lock().unwrap();
        let narrowed = script_key(method, first_param);
        for key in [narrowed.as_str(), method] {
            if let Some(outcome) = queued.get_mut(key).and_then(VecDeque::pop_front) {
                return outcome;
            }
        }
        drop(queued);

        self.fallbacks
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| RpcOutcome::NetworkFailure(format!("no scripted response for {}", method)))
    }
}

fn script_key(method: &str, first_param: Option<&str>) -> String {
    match first_param {
        Some(p) => format!("{}:{}", method, p),
        None => method.to_string(),
    }
}

#[async_trait]
impl RpcTransport for MockRpc {
    async fn call(&self, method: &str, params: Value) -> RpcOutcome {
        let call = RecordedCall {
            method: method.to_string(),
            params,
        };
        let first_param = call.first_param().map(str::to_string);
        self.calls.lock().unwrap().push(call);

        let delay = first_param
            .as_deref()
            .and_then(|p| self.delays.lock().unwrap().get(p).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.next_outcome(method, first_param.as_deref())
    }
}

/// Sleeper that records requested delays and returns immediately
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far
    pub fn delays(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_narrowed_script_takes_priority() {
        let rpc = MockRpc::new()
            .with_response("getAccountInfo", RpcOutcome::RateLimited)
            .with_response_for("getAccountInfo", "MintA", RpcOutcome::Success(json!(1)));

        let first = rpc.call("getAccountInfo", json!(["MintA"])).await;
        assert_eq!(first, RpcOutcome::Success(json!(1)));

        let second = rpc.call("getAccountInfo", json!(["MintA"])).await;
        assert_eq!(second, RpcOutcome::RateLimited);
    }

    #[tokio::test]
    async fn test_fallback_then_network_failure() {
        let rpc = MockRpc::new().with_fallback("getTransaction", RpcOutcome::Success(json!(null)));

        assert!(rpc.call("getTransaction", json!(["sig"])).await.is_success());
        assert!(matches!(
            rpc.call("getSignaturesForAddress", json!(["Mint"])).await,
            RpcOutcome::NetworkFailure(_)
        ));
        assert_eq!(rpc.calls().len(), 2);
        assert_eq!(rpc.calls_to("getTransaction")[0].first_param(), Some("sig"));
    }

    #[tokio::test]
    async fn test_recording_sleeper() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(2)).await;
        sleeper.sleep(Duration::from_secs(4)).await;
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }
}
