//! Core library for quotesheet.
//!
//! This crate contains:
//! - Domain types for tickers, daily records and sheet rows
//! - The Alpha Vantage daily quote source with retry and pacing
//! - Service-account auth and the Google Sheets values client
//! - The sync orchestrator, CSV backup and sheet validator

pub mod adapters;
pub mod auth;
pub mod backup;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod retry;
pub mod sheets;
pub mod sync;
pub mod throttling;
pub mod validate;

pub use adapters::{parse_latest_daily, AlphaVantageDaily, ALPHAVANTAGE_BASE_URL};
pub use auth::{AccessToken, Scope, ServiceAccountAuthenticator, ServiceAccountKey};
pub use backup::write_backup;
pub use config::{
    TrackerConfig, DEFAULT_BACKUP_PATH, DEFAULT_CREDENTIALS_PATH, DEFAULT_SYMBOLS,
    DEFAULT_TAB_NAME,
};
pub use data_source::{DailyQuoteSource, SourceError, SourceErrorKind, SourceFuture};
pub use domain::{SheetRow, StockRecord, Symbol, HEADERS};
pub use error::{AuthError, BackupError, ConfigError, SheetError, TrackerError, ValidationError};
pub use fetch::fetch_with_retry;
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use retry::{Backoff, RetryConfig, RetryPolicy};
pub use sheets::{quote_tab, GoogleSheetsClient, SheetAccessor, SheetFuture, SheetsApi};
pub use sync::{BackupOutcome, SymbolOutcome, SyncJob, SyncReport, SyncSummary};
pub use throttling::RequestPacer;
pub use validate::{differing_fields, validate_symbol, Validation};
