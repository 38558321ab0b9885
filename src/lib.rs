//! Mint Sentinel - Solana token custody-risk review library
//!
//! Queries a Solana JSON-RPC endpoint for a mint account, decodes its SPL Token
//! or Token-2022 state and classifies it against a fixed policy on freeze
//! authority and risky extensions. Launch-program tokens additionally get a
//! provenance check over their transaction history.
//!
//! # Modules
//!
//! - `domain`: Core types and policy (TokenRecord, SecurityReview, classifier)
//! - `ports`: Trait abstractions (RpcTransport, Sleeper) and test doubles
//! - `adapters`: External implementations (HTTP RPC, retry, decoders, provenance, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Single-address analyzer and batch orchestrator

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;

pub use application::{AnalysisError, BatchOrchestrator, TokenAnalyzer};
pub use config::{load_config, Config};
pub use domain::{SecurityReview, TokenRecord, TokenReport, TokenSummary};
