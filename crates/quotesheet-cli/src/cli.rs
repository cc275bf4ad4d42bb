//! CLI argument definitions for quotesheet.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sync` | Append the latest daily quote per symbol to the tracker tab |
//! | `validate` | Compare the last stored row for one symbol against the API |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--strict` | `false` | Failed symbols or a mismatch exit with code 5 |
//!
//! Environment values (`SHEET_ID`, `ALPHA_VANTAGE_API_KEY`, ...) are read
//! first, then any flag given here overrides them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "quotesheet",
    author,
    version,
    about = "Track daily stock quotes in a Google Sheet"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Treat failed symbols and validation mismatches as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per result.
    Text,
    /// A single JSON document on stdout.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch each symbol's latest daily quote and append the new ones.
    ///
    /// # Examples
    ///
    ///   quotesheet sync
    ///   quotesheet sync --symbols AAPL,MSFT --tab "Stock Tracker"
    Sync(SyncArgs),

    /// Check that the sheet's last row for a symbol matches the API.
    ///
    /// # Examples
    ///
    ///   quotesheet validate
    ///   quotesheet validate MSFT --format json
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Comma-separated symbols, replacing the configured list.
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub sheet: SheetArgs,

    /// CSV file holding the rows added by this run.
    #[arg(long)]
    pub backup: Option<PathBuf>,

    /// Total fetch attempts per symbol.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Fixed delay between fetch attempts.
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Symbol to validate.
    #[arg(default_value = "AAPL")]
    pub symbol: String,

    #[command(flatten)]
    pub sheet: SheetArgs,
}

#[derive(Debug, Args)]
pub struct SheetArgs {
    /// Tracker tab name.
    #[arg(long)]
    pub tab: Option<String>,

    /// Service-account key file.
    #[arg(long)]
    pub credentials: Option<PathBuf>,
}
