//! Mint Sentinel - custody-risk review for Solana token mints
//!
//! Reads mint accounts over JSON-RPC and reports a PASSED / FAILED /
//! NOT_A_TOKEN verdict per address.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use mint_sentinel::adapters::cli::{
    batch_output_path, read_address_list, AnalyzeCmd, BatchCmd, CliApp, Command,
};
use mint_sentinel::application::{BatchOrchestrator, TokenAnalyzer};
use mint_sentinel::config::{load_config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (SOLANA_RPC_URL may live there)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config = resolve_config(&app)?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Analyze(cmd) => analyze_command(cmd, &config).await,
        Command::Batch(cmd) => batch_command(cmd, &config).await,
    }
}

fn resolve_config(app: &CliApp) -> Result<Config> {
    let mut config = match &app.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    // SOLANA_RPC_URL beats the file, --rpc-url beats both
    config.apply_env_overrides();
    if let Some(url) = &app.rpc_url {
        config.rpc.url = url.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;
    Ok(())
}

async fn analyze_command(cmd: AnalyzeCmd, config: &Config) -> Result<()> {
    let analyzer = TokenAnalyzer::from_config(config).context("Failed to create RPC client")?;

    match analyzer.lookup(&cmd.address).await {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(message) => anyhow::bail!("{}", message),
    }
}

async fn batch_command(cmd: BatchCmd, config: &Config) -> Result<()> {
    let addresses = read_address_list(&cmd.file)?;
    if addresses.is_empty() {
        tracing::warn!("No addresses found in {}", cmd.file.display());
        return Ok(());
    }

    let analyzer = TokenAnalyzer::from_config(config).context("Failed to create RPC client")?;
    let concurrency = cmd.concurrency.unwrap_or(config.batch.concurrency);
    let batch = BatchOrchestrator::new(Arc::new(analyzer), concurrency);

    tracing::info!(
        "Reviewing {} tokens against {} (concurrency {})",
        addresses.len(),
        config.rpc.url,
        batch.concurrency()
    );
    let reports = batch.process_many(&addresses).await;

    let path = batch_output_path(&cmd.output_prefix, chrono::Local::now());
    let json = serde_json::to_string_pretty(&reports)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    tracing::info!(
        "Processed {}/{} tokens successfully, results saved to {}",
        succeeded,
        reports.len(),
        path.display()
    );
    println!("{}", path.display());
    Ok(())
}
