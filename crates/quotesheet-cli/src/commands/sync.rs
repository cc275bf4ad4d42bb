use std::sync::Arc;
use std::time::Duration;

use quotesheet_core::{
    Backoff, BackupOutcome, HttpClient, Scope, Symbol, SymbolOutcome, SyncJob, SyncReport,
    SyncSummary, TrackerConfig,
};
use serde::Serialize;

use crate::cli::SyncArgs;
use crate::error::CliError;

use super::{connect_sheets, load_config, quote_source, CommandResult};

#[derive(Debug, Serialize)]
struct SyncResponseData<'a> {
    tab: &'a str,
    summary: SyncSummary,
    report: &'a SyncReport,
}

pub async fn run(args: &SyncArgs, http_client: Arc<dyn HttpClient>) -> Result<CommandResult, CliError> {
    let config = apply_overrides(load_config(&args.sheet)?, args)?;

    let sheets = connect_sheets(&config, Arc::clone(&http_client), Scope::ReadWrite).await?;
    let source = quote_source(&config, http_client);

    let job = SyncJob::new(config, Arc::new(source), Arc::new(sheets));
    let report = job.run().await?;

    let data = serde_json::to_value(SyncResponseData {
        tab: &job.config().tab_name,
        summary: report.summary(),
        report: &report,
    })?;

    Ok(CommandResult {
        data,
        lines: report_lines(&report),
        failure_count: report.failure_count(),
    })
}

fn apply_overrides(mut config: TrackerConfig, args: &SyncArgs) -> Result<TrackerConfig, CliError> {
    if !args.symbols.is_empty() {
        let symbols = args
            .symbols
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Symbol::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        config = config.with_symbols(symbols)?;
    }
    if let Some(path) = &args.backup {
        config.backup_path = path.clone();
    }
    if let Some(attempts) = args.retries {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay_ms) = args.retry_delay_ms {
        config.retry.backoff = Backoff::Fixed {
            delay: Duration::from_millis(delay_ms),
        };
    }
    Ok(config)
}

fn report_lines(report: &SyncReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.outcomes.len() + 2);
    if report.headers_written {
        lines.push(String::from("Added column headers"));
    }

    lines.extend(report.outcomes.iter().map(|outcome| match outcome {
        SymbolOutcome::Added { symbol, date } => format!("Added: {symbol} on {date}"),
        SymbolOutcome::Skipped { symbol, date } => format!("Skipped {symbol} on {date}"),
        SymbolOutcome::FetchFailed { symbol } => format!("Failed to fetch {symbol} after retries"),
        SymbolOutcome::SheetFailed {
            symbol,
            date,
            error,
        } => format!("Sheet error for {symbol} on {date}: {error}"),
    }));

    match &report.backup {
        BackupOutcome::NotNeeded => {}
        BackupOutcome::Written { path, .. } => lines.push(format!("Backup saved to {path}")),
        BackupOutcome::Failed { path, error } => {
            lines.push(format!("Backup to {path} failed: {error}"));
        }
    }
    lines
}
