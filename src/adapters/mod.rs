//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Solana: HTTP JSON-RPC transport and the retry/backoff controller
//! - Token metadata: mint and Metaplex metadata account reads and decoders
//! - Provenance: signature-history walk for launch-program tokens
//! - CLI: Command-line interface definitions

pub mod solana;
pub mod token_metadata;
pub mod provenance;
pub mod cli;

pub use solana::{HttpRpcClient, RetryController, RetryPolicy, RpcError};
pub use token_metadata::TokenAccountClient;
pub use provenance::ProvenanceVerifier;
pub use cli::CliApp;
