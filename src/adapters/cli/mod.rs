//! CLI Adapter
//!
//! Command-line interface for mint-sentinel.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    batch_output_path, parse_address_list, read_address_list, AnalyzeCmd, BatchCmd, CliApp,
    Command,
};
