//! CLI Commands
//!
//! Argument definitions for the mint-sentinel binary plus the small file
//! helpers the batch command needs.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Mint Sentinel - custody-risk review for Solana token mints
#[derive(Parser, Debug)]
#[command(
    name = "mint-sentinel",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Custody-risk review for Solana token mints",
    long_about = "Mint Sentinel reads a mint account over Solana JSON-RPC, decodes its SPL Token \
                  or Token-2022 state and reports PASSED, FAILED or NOT_A_TOKEN against a fixed \
                  freeze-authority and extension policy."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override RPC URL
    #[arg(long, value_name = "URL", global = true)]
    pub rpc_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a single mint
    Analyze(AnalyzeCmd),

    /// Review every address in a file and write a JSON report
    Batch(BatchCmd),
}

/// Review a single mint
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Mint address (base58)
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

/// Review many mints
#[derive(Parser, Debug)]
pub struct BatchCmd {
    /// File with one address per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Report file prefix; a timestamp and `.json` are appended
    #[arg(short, long, value_name = "PREFIX", default_value = "token_analysis")]
    pub output_prefix: String,

    /// Override batch concurrency from config
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

/// Addresses from a text file: one per line, blank lines and `#` comments skipped
pub fn read_address_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read address file {}", path.display()))?;
    Ok(parse_address_list(&content))
}

pub fn parse_address_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.json`
pub fn batch_output_path(prefix: &str, at: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("{}_{}.json", prefix, at.format("%Y%m%d_%H%M%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_analyze() {
        let app = CliApp::try_parse_from(["mint-sentinel", "analyze", "Mint111", "--debug"]).unwrap();
        assert!(app.debug);
        match app.command {
            Command::Analyze(cmd) => assert_eq!(cmd.address, "Mint111"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_with_globals() {
        let app = CliApp::try_parse_from([
            "mint-sentinel",
            "--config",
            "sentinel.toml",
            "batch",
            "mints.txt",
            "--output-prefix",
            "review",
            "--rpc-url",
            "http://localhost:8899",
        ])
        .unwrap();

        assert_eq!(app.config, Some(PathBuf::from("sentinel.toml")));
        assert_eq!(app.rpc_url.as_deref(), Some("http://localhost:8899"));
        match app.command {
            Command::Batch(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("mints.txt"));
                assert_eq!(cmd.output_prefix, "review");
                assert!(cmd.concurrency.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_address_is_an_error() {
        assert!(CliApp::try_parse_from(["mint-sentinel", "analyze"]).is_err());
    }

    #[test]
    fn test_parse_address_list() {
        let addrs = parse_address_list("  A \n\n# comment\nB\r\n   \nC");
        assert_eq!(addrs, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_read_address_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Mint1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Mint2").unwrap();

        let addrs = read_address_list(file.path()).unwrap();
        assert_eq!(addrs, vec!["Mint1", "Mint2"]);
        assert!(read_address_list(Path::new("/nonexistent/mints.txt")).is_err());
    }

    #[test]
    fn test_batch_output_path() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(
            batch_output_path("token_analysis", at),
            PathBuf::from("token_analysis_20240309_070502.json")
        );
    }
}
