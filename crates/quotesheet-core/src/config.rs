//! Environment-driven tracker configuration.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SHEET_ID` | yes | |
//! | `ALPHA_VANTAGE_API_KEY` | yes | |
//! | `QUOTESHEET_TAB` | no | `StockTracker` |
//! | `QUOTESHEET_SYMBOLS` | no | ten large-cap US tickers |
//! | `QUOTESHEET_BACKUP_PATH` | no | `stock-backup.csv` |
//! | `GOOGLE_APPLICATION_CREDENTIALS` | no | `credentials.json` |
//! | `ALPHA_VANTAGE_CALLS_PER_MINUTE` | no | `0` (unpaced) |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;

use crate::error::{ConfigError, ValidationError};
use crate::retry::RetryConfig;
use crate::Symbol;

pub const DEFAULT_TAB_NAME: &str = "StockTracker";
pub const DEFAULT_BACKUP_PATH: &str = "stock-backup.csv";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_SYMBOLS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "NFLX", "INTC", "IBM",
];

/// Everything a sync or validation run needs, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    pub tab_name: String,
    pub symbols: Vec<Symbol>,
    pub backup_path: PathBuf,
    pub credentials_path: PathBuf,
    /// Upstream quote calls allowed per minute; `0` disables pacing.
    pub calls_per_minute: u32,
    pub retry: RetryConfig,
}

impl TrackerConfig {
    /// Builds a config with defaults for everything but the two required values.
    pub fn new(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
            tab_name: String::from(DEFAULT_TAB_NAME),
            symbols: default_symbols(),
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            calls_per_minute: 0,
            retry: RetryConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`TrackerConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());
        let required = |name: &'static str| value(name).ok_or(ConfigError::MissingEnv { name });

        let mut config = Self::new(required("SHEET_ID")?, required("ALPHA_VANTAGE_API_KEY")?);

        if let Some(tab) = value("QUOTESHEET_TAB") {
            config = config.with_tab_name(tab)?;
        }
        if let Some(raw) = value("QUOTESHEET_SYMBOLS") {
            config.symbols = Symbol::parse_list(&raw)?;
        }
        if let Some(path) = value("QUOTESHEET_BACKUP_PATH") {
            config.backup_path = PathBuf::from(path);
        }
        if let Some(path) = value("GOOGLE_APPLICATION_CREDENTIALS") {
            config.credentials_path = PathBuf::from(path);
        }
        if let Some(raw) = value("ALPHA_VANTAGE_CALLS_PER_MINUTE") {
            config.calls_per_minute =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnv {
                        name: "ALPHA_VANTAGE_CALLS_PER_MINUTE",
                        value: raw.clone(),
                        reason: e.to_string(),
                    })?;
        }

        Ok(config)
    }

    pub fn with_tab_name(mut self, tab_name: impl Into<String>) -> Result<Self, ValidationError> {
        let tab_name = tab_name.into();
        if tab_name.trim().is_empty() {
            return Err(ValidationError::EmptyTabName);
        }
        self.tab_name = tab_name;
        Ok(self)
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Result<Self, ValidationError> {
        if symbols.is_empty() {
            return Err(ValidationError::EmptySymbolList);
        }
        self.symbols = symbols;
        Ok(self)
    }
}

fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS
        .iter()
        .filter_map(|raw| Symbol::parse(raw).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn required_values_only_yields_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("SHEET_ID", "sheet-123"),
            ("ALPHA_VANTAGE_API_KEY", "key"),
        ]))
        .expect("config should load");

        assert_eq!(config.spreadsheet_id, "sheet-123");
        assert_eq!(config.tab_name, "StockTracker");
        assert_eq!(config.symbols.len(), 10);
        assert_eq!(config.symbols[0].as_str(), "AAPL");
        assert_eq!(config.backup_path, PathBuf::from("stock-backup.csv"));
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.calls_per_minute, 0);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn missing_sheet_id_is_reported_by_name() {
        let error = TrackerConfig::from_lookup(lookup(&[("ALPHA_VANTAGE_API_KEY", "key")]))
            .expect_err("must fail");
        assert_eq!(error, ConfigError::MissingEnv { name: "SHEET_ID" });
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let error = TrackerConfig::from_lookup(lookup(&[
            ("SHEET_ID", "sheet-123"),
            ("ALPHA_VANTAGE_API_KEY", "  "),
        ]))
        .expect_err("must fail");
        assert_eq!(
            error,
            ConfigError::MissingEnv {
                name: "ALPHA_VANTAGE_API_KEY"
            }
        );
    }

    #[test]
    fn optional_overrides_are_applied() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("SHEET_ID", "sheet-123"),
            ("ALPHA_VANTAGE_API_KEY", "key"),
            ("QUOTESHEET_TAB", "Stock Tracker"),
            ("QUOTESHEET_SYMBOLS", "ibm, nflx"),
            ("QUOTESHEET_BACKUP_PATH", "/tmp/out.csv"),
            ("ALPHA_VANTAGE_CALLS_PER_MINUTE", "5"),
        ]))
        .expect("config should load");

        assert_eq!(config.tab_name, "Stock Tracker");
        let names: Vec<&str> = config.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["IBM", "NFLX"]);
        assert_eq!(config.backup_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.calls_per_minute, 5);
    }

    #[test]
    fn non_numeric_rate_is_invalid() {
        let error = TrackerConfig::from_lookup(lookup(&[
            ("SHEET_ID", "sheet-123"),
            ("ALPHA_VANTAGE_API_KEY", "key"),
            ("ALPHA_VANTAGE_CALLS_PER_MINUTE", "five"),
        ]))
        .expect_err("must fail");
        assert!(matches!(error, ConfigError::InvalidEnv { name: "ALPHA_VANTAGE_CALLS_PER_MINUTE", .. }));
    }

    #[test]
    fn invalid_symbol_in_list_is_rejected() {
        let error = TrackerConfig::from_lookup(lookup(&[
            ("SHEET_ID", "sheet-123"),
            ("ALPHA_VANTAGE_API_KEY", "key"),
            ("QUOTESHEET_SYMBOLS", "AAPL,$$$"),
        ]))
        .expect_err("must fail");
        assert!(matches!(error, ConfigError::Validation(_)));
    }
}
