//! Application Layer - Use cases
//!
//! - `analyzer`: single-address lookup pipeline
//! - `batch`: bounded fan-out over many addresses

pub mod analyzer;
pub mod batch;

pub use analyzer::{AnalysisError, TokenAnalyzer};
pub use batch::BatchOrchestrator;
