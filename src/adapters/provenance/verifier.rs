//! Provenance Verifier
//!
//! Walks a mint's signature history newest-first, one page at a time, until a
//! short page marks the end. The last signature of that page is the genesis
//! transaction; it is genuine when one of its inner instructions creates an
//! account owned by the launch program.
//!
//! Never fails: an RPC error ends the walk and keeps the partial count and
//! the oldest signature seen so far, with `is_genuine = false`.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::types::{InstructionEntry, SignatureInfo, TransactionResult};
use crate::adapters::solana::{Pacing, RetryController, RpcError};
use crate::domain::known_programs::PUMP_FUN_PROGRAM_ID;
use crate::domain::token::ProvenanceInfo;

/// Largest page `getSignaturesForAddress` serves
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct ProvenanceVerifier {
    rpc: RetryController,
    page_size: usize,
    launch_program: String,
    commitment: String,
}

impl ProvenanceVerifier {
    pub fn new(rpc: RetryController, page_size: usize) -> Self {
        Self {
            rpc,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            launch_program: PUMP_FUN_PROGRAM_ID.to_string(),
            commitment: "confirmed".to_string(),
        }
    }

    /// Override the program expected to create the mint account
    pub fn with_launch_program(mut self, program_id: impl Into<String>) -> Self {
        self.launch_program = program_id.into();
        self
    }

    pub fn with_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.commitment = commitment.into();
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Find the genesis transaction of `address` and check who created it
    pub async fn verify(&self, address: &str) -> ProvenanceInfo {
        let mut provenance = ProvenanceInfo::default();

        if let Err(e) = self.walk_history(address, &mut provenance).await {
            warn!(
                "History walk for {} aborted after {} signatures: {}",
                address, provenance.transaction_count, e
            );
            return provenance;
        }

        let Some(genesis) = provenance.first_transaction_signature.clone() else {
            debug!("No transactions found for {}", address);
            return provenance;
        };

        match self.inspect_genesis(&genesis).await {
            Ok(genuine) => provenance.is_genuine = genuine,
            Err(e) => warn!("Failed to inspect genesis transaction {}: {}", genesis, e),
        }

        info!(
            "Provenance for {}: {} transactions, genuine={}",
            address, provenance.transaction_count, provenance.is_genuine
        );
        provenance
    }

    /// Page backwards until a short page. Updates `provenance` after every
    /// page so a failure leaves the partial state in place.
    pub async fn walk_history(
        &self,
        address: &str,
        provenance: &mut ProvenanceInfo,
    ) -> Result<(), RpcError> {
        let mut before: Option<String> = None;

        loop {
            let page = self.fetch_page(address, before.as_deref()).await?;
            provenance.transaction_count += page.len() as u64;

            if let Some(oldest) = page.last() {
                provenance.first_transaction_signature = Some(oldest.signature.clone());
                before = Some(oldest.signature.clone());
            }

            if page.len() < self.page_size {
                return Ok(());
            }
            debug!(
                "{}: full page, {} signatures so far",
                address, provenance.transaction_count
            );
        }
    }

    async fn fetch_page(
        &self,
        address: &str,
        before: Option<&str>,
    ) -> Result<Vec<SignatureInfo>, RpcError> {
        let params = json!([
            address,
            {"before": before, "limit": self.page_size, "commitment": self.commitment}
        ]);
        let result = self
            .rpc
            .call("getSignaturesForAddress", params, Pacing::Immediate)
            .await?;
        if result.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(result)?)
    }

    /// Whether the genesis transaction created an account owned by the launch program
    async fn inspect_genesis(&self, signature: &str) -> Result<bool, RpcError> {
        let params = json!([
            signature,
            {"encoding": "jsonParsed", "maxSupportedTransactionVersion": 0, "commitment": self.commitment}
        ]);
        let result = self.rpc.call("getTransaction", params, Pacing::Immediate).await?;
        Ok(self.is_launch_creation(result)?)
    }

    fn is_launch_creation(&self, result: Value) -> Result<bool, serde_json::Error> {
        if result.is_null() {
            return Ok(false);
        }
        let tx: TransactionResult = serde_json::from_value(result)?;
        let genuine = tx
            .inner_instructions()
            .filter_map(InstructionEntry::created_account_owner)
            .any(|owner| owner == self.launch_program);
        Ok(genuine)
    }
}
