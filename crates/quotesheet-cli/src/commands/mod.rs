mod sync;
mod validate;

use std::sync::Arc;

use quotesheet_core::{
    AlphaVantageDaily, GoogleSheetsClient, HttpClient, ReqwestHttpClient, RequestPacer, Scope,
    ServiceAccountAuthenticator, ServiceAccountKey, TrackerConfig,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command, SheetArgs};
use crate::error::CliError;

/// What a command produced, ready for rendering.
pub struct CommandResult {
    pub data: Value,
    pub lines: Vec<String>,
    /// Counted against `--strict`.
    pub failure_count: usize,
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    match &cli.command {
        Command::Sync(args) => sync::run(args, http_client).await,
        Command::Validate(args) => validate::run(args, http_client).await,
    }
}

/// Environment config with the shared sheet flags applied on top.
fn load_config(sheet: &SheetArgs) -> Result<TrackerConfig, CliError> {
    let mut config = TrackerConfig::from_env()?;
    if let Some(tab) = &sheet.tab {
        config = config.with_tab_name(tab.as_str())?;
    }
    if let Some(path) = &sheet.credentials {
        config.credentials_path = path.clone();
    }
    debug!(
        tab = %config.tab_name,
        symbols = config.symbols.len(),
        credentials = %config.credentials_path.display(),
        "configuration loaded"
    );
    Ok(config)
}

async fn connect_sheets(
    config: &TrackerConfig,
    http_client: Arc<dyn HttpClient>,
    scope: Scope,
) -> Result<GoogleSheetsClient, CliError> {
    let key = ServiceAccountKey::from_file(&config.credentials_path)?;
    let token = ServiceAccountAuthenticator::new(key, Arc::clone(&http_client))
        .authorize(scope)
        .await?;
    debug!(scope = scope.as_url(), "sheets client authorized");
    Ok(GoogleSheetsClient::new(
        http_client,
        config.spreadsheet_id.as_str(),
        token,
    ))
}

fn quote_source(config: &TrackerConfig, http_client: Arc<dyn HttpClient>) -> AlphaVantageDaily {
    let source = AlphaVantageDaily::new(http_client, config.api_key.as_str());
    match RequestPacer::per_minute(config.calls_per_minute) {
        Some(pacer) => {
            debug!(calls_per_minute = config.calls_per_minute, "pacing quote requests");
            source.with_pacer(pacer)
        }
        None => source,
    }
}
