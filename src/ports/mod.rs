//! Ports Layer - Trait definitions for external dependencies
//!
//! The interfaces adapters implement and the application layer consumes:
//! - JSON-RPC transport with explicit outcome tags
//! - Backoff/pacing suspension
//!
//! `mocks` holds scripted doubles for both, used by unit and integration tests.

pub mod rpc;
pub mod mocks;

pub use rpc::{RpcOutcome, RpcTransport, Sleeper, TokioSleeper};
