//! Token Account Client
//!
//! Fetches primary mint accounts with `getAccountInfo` (`jsonParsed`) and
//! Metaplex metadata accounts (`base64`) through the shared retry controller.

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::decoder::{decode_metadata_base64, metadata_address, DecodeError, MetadataAccount};
use super::types::{AccountInfoResult, AccountInfoValue};
use crate::adapters::solana::{Pacing, RetryController, RpcError};

/// Default commitment for account reads
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Client for mint and metadata account reads
#[derive(Debug, Clone)]
pub struct TokenAccountClient {
    rpc: RetryController,
    commitment: String,
}

impl TokenAccountClient {
    pub fn new(rpc: RetryController) -> Self {
        Self::with_commitment(rpc, DEFAULT_COMMITMENT)
    }

    pub fn with_commitment(rpc: RetryController, commitment: impl Into<String>) -> Self {
        Self {
            rpc,
            commitment: commitment.into(),
        }
    }

    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    /// Fetch the primary account. `Ok(None)` when the address holds no account.
    pub async fn fetch_account(&self, address: &str) -> Result<Option<AccountInfoValue>, RpcError> {
        let params = json!([
            address,
            {"encoding": "jsonParsed", "commitment": self.commitment}
        ]);
        let result = self.rpc.call("getAccountInfo", params, Pacing::Immediate).await?;
        parse_account_result(result)
    }

    /// Fetch and decode the Metaplex metadata account for a mint.
    ///
    /// Every failure is absorbed: the caller keeps its sentinel names.
    pub async fn fetch_metadata(&self, mint: &str) -> Option<MetadataAccount> {
        match self.try_fetch_metadata(mint).await {
            Ok(Some(meta)) => Some(meta),
            Ok(None) => {
                debug!("No metadata account for {}", mint);
                None
            }
            Err(e) => {
                warn!("Metadata unavailable for {}: {}", mint, e);
                None
            }
        }
    }

    async fn try_fetch_metadata(&self, mint: &str) -> Result<Option<MetadataAccount>, MetadataFetchError> {
        let pda = metadata_address(mint)?;
        let params = json!([
            pda.to_string(),
            {"encoding": "base64", "commitment": self.commitment}
        ]);
        let result = self.rpc.call("getAccountInfo", params, Pacing::Paced).await?;

        let Some(account) = parse_account_result(result)? else {
            return Ok(None);
        };
        let payload = account
            .data
            .base64_payload()
            .ok_or(DecodeError::UnexpectedEncoding)?;
        Ok(Some(decode_metadata_base64(payload)?))
    }
}

/// Extract `value` from a `getAccountInfo` result
fn parse_account_result(result: Value) -> Result<Option<AccountInfoValue>, RpcError> {
    if result.is_null() {
        return Ok(None);
    }
    let parsed: AccountInfoResult = serde_json::from_value(result)?;
    Ok(parsed.value)
}

#[derive(Debug, thiserror::Error)]
enum MetadataFetchError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
