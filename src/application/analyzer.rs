//! Token Analyzer
//!
//! Single-address pipeline:
//! primary account -> decode -> metadata fallback -> classify -> provenance.
//!
//! The record is owned by the calling task and mutated in place as each
//! stage completes.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::adapters::provenance::ProvenanceVerifier;
use crate::adapters::solana::{HttpRpcClient, RetryController, RpcError};
use crate::adapters::token_metadata::{decode_primary_account, extension_set, TokenAccountClient};
use crate::config::Config;
use crate::domain::classifier::classify;
use crate::domain::known_programs::{is_launch_family_candidate, ProgramLabels};
use crate::domain::token::{OwnerProgram, TokenRecord, TokenReport, TokenSummary};
use crate::ports::rpc::{RpcTransport, Sleeper, TokioSleeper};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("Token not found or invalid address")]
    NotFound,
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),
}

/// Runs the lookup pipeline for one address at a time.
///
/// Cheap to share: every task in a batch holds an `Arc` to the same analyzer
/// and therefore the same connection pool.
#[derive(Debug, Clone)]
pub struct TokenAnalyzer {
    accounts: TokenAccountClient,
    provenance: Option<ProvenanceVerifier>,
    labels: ProgramLabels,
}

impl TokenAnalyzer {
    pub fn new(
        accounts: TokenAccountClient,
        provenance: Option<ProvenanceVerifier>,
        labels: ProgramLabels,
    ) -> Self {
        Self {
            accounts,
            provenance,
            labels,
        }
    }

    /// Analyzer talking to the configured HTTP endpoint
    pub fn from_config(config: &Config) -> Result<Self, RpcError> {
        let client = HttpRpcClient::new(config.rpc.url.clone(), config.rpc.timeout())?;
        Ok(Self::with_transport(Arc::new(client), Arc::new(TokioSleeper), config))
    }

    /// Analyzer over any transport and sleeper, configured from `config`
    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        sleeper: Arc<dyn Sleeper>,
        config: &Config,
    ) -> Self {
        let rpc = RetryController::with_sleeper(transport, sleeper, config.retry_policy());
        let accounts = TokenAccountClient::with_commitment(rpc.clone(), config.rpc.commitment.clone());
        let provenance = config.provenance.enabled.then(|| {
            ProvenanceVerifier::new(rpc, config.provenance.page_size)
                .with_commitment(config.rpc.commitment.clone())
        });

        Self::new(accounts, provenance, config.program_labels())
    }

    /// Build the full record for `address`
    pub async fn analyze(&self, address: &str) -> Result<TokenRecord, AnalysisError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AnalysisError::InvalidAddress(address.to_string()));
        }

        let account = self
            .accounts
            .fetch_account(address)
            .await?
            .ok_or(AnalysisError::NotFound)?;
        let decoded = decode_primary_account(&account);

        let owner = OwnerProgram::from_id(&decoded.owner);
        let mut record = TokenRecord::new(address, owner, &self.labels);

        if !record.owner_program.is_token_program() {
            debug!("{} is owned by {}, not a token", address, decoded.owner);
            return Ok(record);
        }

        if let Some(name) = decoded.name.filter(|n| !n.is_empty()) {
            record.name = name;
        }
        if let Some(symbol) = decoded.symbol.filter(|s| !s.is_empty()) {
            record.symbol = symbol;
        }
        record.freeze_authority = decoded.freeze_authority;
        record.update_authority = decoded.update_authority;

        if record.owner_program == OwnerProgram::Token2022 {
            record.extensions = Some(extension_set(&decoded.extensions));
        }

        if let Some(meta) = self.accounts.fetch_metadata(address).await {
            record.fill_display_names(&meta.name, &meta.symbol);
            if record.update_authority.is_none() {
                record.update_authority = Some(meta.update_authority);
            }
        }

        record.security_review = classify(&record);

        if let Some(verifier) = &self.provenance {
            if is_launch_family_candidate(address, record.update_authority.as_deref()) {
                record.provenance = Some(verifier.verify(address).await);
            }
        }

        Ok(record)
    }

    /// Flattened record or the human-readable error string
    pub async fn lookup(&self, address: &str) -> Result<TokenSummary, String> {
        self.analyze(address)
            .await
            .map(|record| record.summary())
            .map_err(|e| e.to_string())
    }

    /// Status-tagged entry for batch output
    pub async fn report(&self, address: &str) -> TokenReport {
        match self.analyze(address).await {
            Ok(record) => TokenReport::success(&record),
            Err(e) => TokenReport::error(address.trim(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::known_programs::{
        PUMP_FUN_UPDATE_AUTHORITY, SPL_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_2022_PROGRAM_ID,
    };
    use crate::domain::token::{SecurityReview, NOT_AVAILABLE};
    use crate::ports::mocks::{MockRpc, RecordingSleeper};
    use crate::ports::rpc::RpcOutcome;
    use serde_json::{json, Value};

    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn analyzer(rpc: MockRpc) -> TokenAnalyzer {
        TokenAnalyzer::with_transport(Arc::new(rpc), Arc::new(RecordingSleeper::new()), &Config::default())
    }

    fn mint_account(owner: &str, info: Value) -> RpcOutcome {
        RpcOutcome::Success(json!({
            "context": {"slot": 1},
            "value": {
                "owner": owner,
                "lamports": 1461600,
                "data": {"parsed": {"info": info, "type": "mint"}, "program": "spl-token", "space": 82}
            }
        }))
    }

    fn no_metadata(rpc: MockRpc) -> MockRpc {
        // First getAccountInfo answers the mint; later ones (the metadata PDA) find nothing
        rpc.with_fallback("getAccountInfo", RpcOutcome::Success(json!({"value": null})))
    }

    #[tokio::test]
    async fn test_spl_without_freeze_passes() {
        let rpc = no_metadata(MockRpc::new().with_response_for(
            "getAccountInfo",
            MINT,
            mint_account(SPL_TOKEN_PROGRAM_ID, json!({"freezeAuthority": null, "decimals": 6})),
        ));
        let record = analyzer(rpc).analyze(MINT).await.unwrap();

        assert_eq!(record.security_review, SecurityReview::Passed);
        assert!(record.extensions.is_none());
        assert!(record.provenance.is_none());
        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.owner_display, format!("{} (Token Program)", SPL_TOKEN_PROGRAM_ID));
    }

    #[tokio::test]
    async fn test_token2022_with_fee_fails() {
        let rpc = no_metadata(MockRpc::new().with_response_for(
            "getAccountInfo",
            MINT,
            mint_account(
                TOKEN_2022_PROGRAM_ID,
                json!({"extensions": [{"extension": "transferFeeConfig", "state": {
                    "newerTransferFee": {"epoch": 1, "transferFeeBasisPoints": 100}
                }}]}),
            ),
        ));
        let record = analyzer(rpc).analyze(MINT).await.unwrap();

        assert_eq!(record.security_review, SecurityReview::Failed);
        assert_eq!(record.extensions.unwrap().transfer_fee_basis_points, Some(100));
    }

    #[tokio::test]
    async fn test_system_account_short_circuits() {
        let rpc = MockRpc::new().with_response(
            "getAccountInfo",
            RpcOutcome::Success(json!({"value": {"owner": SYSTEM_PROGRAM_ID, "data": ["", "base64"]}})),
        );
        let record = analyzer(rpc.clone()).analyze(MINT).await.unwrap();

        assert_eq!(record.security_review, SecurityReview::NotAToken);
        assert_eq!(record.owner_display, "System Program");
        assert_eq!(rpc.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let rpc = MockRpc::new().with_response("getAccountInfo", RpcOutcome::Success(json!({"value": null})));
        let err = analyzer(rpc).lookup(MINT).await.unwrap_err();
        assert_eq!(err, "Token not found or invalid address");
    }

    #[tokio::test]
    async fn test_blank_address_rejected_without_rpc() {
        let rpc = MockRpc::new();
        let err = analyzer(rpc.clone()).analyze("   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidAddress(_)));
        assert!(rpc.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_authority_triggers_provenance() {
        let rpc = MockRpc::new()
            .with_response_for(
                "getAccountInfo",
                MINT,
                mint_account(
                    TOKEN_2022_PROGRAM_ID,
                    json!({"extensions": [{"extension": "tokenMetadata", "state": {
                        "name": "Launch", "symbol": "LCH", "updateAuthority": PUMP_FUN_UPDATE_AUTHORITY
                    }}]}),
                ),
            )
            .with_fallback("getAccountInfo", RpcOutcome::Success(json!({"value": null})))
            .with_response("getSignaturesForAddress", RpcOutcome::Success(json!([])));
        let record = analyzer(rpc.clone()).analyze(MINT).await.unwrap();

        assert_eq!(record.name, "Launch");
        assert_eq!(record.security_review, SecurityReview::Passed);
        let provenance = record.provenance.unwrap();
        assert_eq!(provenance.transaction_count, 0);
        assert!(!provenance.is_genuine);
        assert_eq!(rpc.calls_to("getSignaturesForAddress").len(), 1);
    }

    #[tokio::test]
    async fn test_provenance_disabled() {
        let rpc = no_metadata(MockRpc::new().with_response_for(
            "getAccountInfo",
            "Mint111pump",
            mint_account(SPL_TOKEN_PROGRAM_ID, json!({})),
        ));
        let mut config = Config::default();
        config.provenance.enabled = false;
        let analyzer =
            TokenAnalyzer::with_transport(Arc::new(rpc.clone()), Arc::new(RecordingSleeper::new()), &config);

        let record = analyzer.analyze("Mint111pump").await.unwrap();
        assert!(record.provenance.is_none());
        assert!(rpc.calls_to("getSignaturesForAddress").is_empty());
    }

    #[tokio::test]
    async fn test_report_carries_error_string() {
        let rpc = MockRpc::new().with_fallback("getAccountInfo", RpcOutcome::ServerError { status: 503 });
        let report = analyzer(rpc).report(MINT).await;
        assert_eq!(
            report,
            TokenReport::error(MINT, "Error: RPC returned status code 503")
        );
    }

    #[tokio::test]
    async fn test_report_trims_address_on_both_outcomes() {
        let rpc = MockRpc::new()
            .with_response_for("getAccountInfo", "Bad111", RpcOutcome::ServerError { status: 500 })
            .with_response_for(
                "getAccountInfo",
                "Wallet111",
                RpcOutcome::Success(json!({"value": {"owner": SYSTEM_PROGRAM_ID, "data": ["", "base64"]}})),
            );
        let analyzer = analyzer(rpc);

        let failed = analyzer.report("  Bad111\n").await;
        assert!(!failed.is_success());
        assert_eq!(failed.address(), "Bad111");

        let ok = analyzer.report(" Wallet111 ").await;
        assert!(ok.is_success());
        assert_eq!(ok.address(), "Wallet111");
    }
}
