//! Batch Orchestrator
//!
//! Fans lookups out over many addresses behind a counting semaphore. Each
//! address runs in its own task; results are collected in input order, not
//! completion order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use super::analyzer::TokenAnalyzer;
use crate::domain::token::TokenReport;

#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    analyzer: Arc<TokenAnalyzer>,
    concurrency: usize,
}

impl BatchOrchestrator {
    /// `concurrency` is clamped to at least one
    pub fn new(analyzer: Arc<TokenAnalyzer>, concurrency: usize) -> Self {
        Self {
            analyzer,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// One report per input address, in input order
    pub async fn process_many(&self, addresses: &[String]) -> Vec<TokenReport> {
        let total = addresses.len();
        let gate = Arc::new(Semaphore::new(self.concurrency));

        let handles: Vec<_> = addresses
            .iter()
            .enumerate()
            .map(|(i, address)| {
                let analyzer = Arc::clone(&self.analyzer);
                let gate = Arc::clone(&gate);
                let address = address.clone();

                tokio::spawn(async move {
                    let _permit = match gate.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return TokenReport::error(address, "Batch cancelled"),
                    };
                    info!("Processing token {}/{} - {}", i + 1, total, address);
                    analyzer.report(&address).await
                })
            })
            .collect();

        let mut reports = Vec::with_capacity(total);
        for (handle, address) in handles.into_iter().zip(addresses) {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Lookup task for {} failed: {}", address, e);
                    reports.push(TokenReport::error(address.clone(), format!("Error: {}", e)));
                }
            }
        }

        let succeeded = reports.iter().filter(|r| r.is_success()).count();
        info!("Batch complete: {}/{} succeeded", succeeded, total);
        reports
    }
}
