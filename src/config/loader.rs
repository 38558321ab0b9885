//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.
//! Every section and key is optional; missing values take the built-in defaults.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::provenance::MAX_PAGE_SIZE;
use crate::adapters::solana::RetryPolicy;
use crate::domain::known_programs::ProgramLabels;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rpc: RpcSection,
    pub retry: RetrySection,
    pub batch: BatchSection,
    pub provenance: ProvenanceSection,
    pub logging: LoggingSection,
    /// Extra or overriding owner-program labels, keyed by program id
    pub labels: HashMap<String, String>,
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    /// JSON-RPC endpoint
    pub url: String,
    /// Commitment level: "processed", "confirmed", "finalized"
    pub commitment: String,
    /// Total timeout per call
    pub timeout_secs: u64,
}

impl Default for RpcSection {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RpcSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.url.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry/backoff section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    /// Total attempts per call
    pub max_retries: u32,
    /// Pause before paced calls
    pub base_delay_ms: u64,
    /// Backoff unit for rate limits and network failures
    pub retry_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            retry_delay_ms: 2000,
        }
    }
}

/// Batch processing section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Lookups allowed in flight at once
    pub concurrency: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Launch-program provenance section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvenanceSection {
    pub enabled: bool,
    /// Signatures per `getSignaturesForAddress` page
    pub page_size: usize,
}

impl Default for ProvenanceSection {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc.url must not be empty".to_string(),
            ));
        }

        if self.rpc.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "rpc.timeout_secs must be > 0".to_string(),
            ));
        }

        if self.retry.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_retries must be >= 1".to_string(),
            ));
        }

        if self.batch.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "batch.concurrency must be >= 1".to_string(),
            ));
        }

        if self.provenance.page_size == 0 || self.provenance.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "provenance.page_size must be 1-{}, got {}",
                MAX_PAGE_SIZE, self.provenance.page_size
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {:?}, got {}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }

    /// Apply environment overrides (currently SOLANA_RPC_URL)
    pub fn apply_env_overrides(&mut self) {
        self.rpc.url = self.rpc.get_rpc_url();
    }

    /// Retry policy for the RPC controller
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            retry_delay: Duration::from_millis(self.retry.retry_delay_ms),
        }
    }

    /// Built-in labels with the `[labels]` table layered on top
    pub fn program_labels(&self) -> ProgramLabels {
        ProgramLabels::default().with_overrides(self.labels.clone())
    }
}
