//! The fetch → dedupe → append → backup run over the configured symbols.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::backup::write_backup;
use crate::data_source::DailyQuoteSource;
use crate::error::{SheetError, TrackerError};
use crate::fetch::fetch_with_retry;
use crate::retry::RetryPolicy;
use crate::sheets::{SheetAccessor, SheetsApi};
use crate::{StockRecord, Symbol, TrackerConfig};

/// What happened to one symbol during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolOutcome {
    Added { symbol: String, date: String },
    Skipped { symbol: String, date: String },
    FetchFailed { symbol: String },
    SheetFailed { symbol: String, date: String, error: String },
}

impl SymbolOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Added { symbol, .. }
            | Self::Skipped { symbol, .. }
            | Self::FetchFailed { symbol }
            | Self::SheetFailed { symbol, .. } => symbol,
        }
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::SheetFailed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// No rows were added, so no file was written.
    NotNeeded,
    Written { path: String, rows: usize },
    Failed { path: String, error: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub added: usize,
    pub skipped: usize,
    pub fetch_failed: usize,
    pub sheet_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub headers_written: bool,
    pub outcomes: Vec<SymbolOutcome>,
    /// Records appended this run, in append order.
    pub added: Vec<StockRecord>,
    pub backup: BackupOutcome,
}

impl SyncReport {
    pub fn summary(&self) -> SyncSummary {
        self.outcomes
            .iter()
            .fold(SyncSummary::default(), |mut summary, outcome| {
                match outcome {
                    SymbolOutcome::Added { .. } => summary.added += 1,
                    SymbolOutcome::Skipped { .. } => summary.skipped += 1,
                    SymbolOutcome::FetchFailed { .. } => summary.fetch_failed += 1,
                    SymbolOutcome::SheetFailed { .. } => summary.sheet_failed += 1,
                }
                summary
            })
    }

    /// Failed symbols plus a failed backup.
    pub fn failure_count(&self) -> usize {
        let backup_failed = usize::from(matches!(self.backup, BackupOutcome::Failed { .. }));
        self.outcomes.iter().filter(|o| o.is_failure()).count() + backup_failed
    }
}

/// One tracker run. Collaborators are injected so tests can substitute fakes.
pub struct SyncJob {
    config: TrackerConfig,
    source: Arc<dyn DailyQuoteSource>,
    sheets: Arc<dyn SheetsApi>,
    retry: Arc<dyn RetryPolicy>,
}

impl SyncJob {
    /// Uses `config.retry` as the retry policy.
    pub fn new(
        config: TrackerConfig,
        source: Arc<dyn DailyQuoteSource>,
        sheets: Arc<dyn SheetsApi>,
    ) -> Self {
        let retry: Arc<dyn RetryPolicy> = Arc::new(config.retry.clone());
        Self {
            config,
            source,
            sheets,
            retry,
        }
    }

    pub fn with_retry_policy(mut self, retry: Arc<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Header setup failures abort the run. Per-symbol sheet failures are
    /// captured in the report and the loop continues.
    pub async fn run(&self) -> Result<SyncReport, TrackerError> {
        let accessor = SheetAccessor::new(self.sheets.as_ref(), &self.config.tab_name);

        let headers_written = accessor.ensure_headers().await?;
        if headers_written {
            info!(tab = %self.config.tab_name, "header row written");
        }

        let mut outcomes = Vec::with_capacity(self.config.symbols.len());
        let mut added = Vec::new();
        for symbol in &self.config.symbols {
            let (outcome, record) = self.sync_symbol(&accessor, symbol).await;
            outcomes.push(outcome);
            added.extend(record);
        }

        let backup = self.backup(&added);
        Ok(SyncReport {
            headers_written,
            outcomes,
            added,
            backup,
        })
    }

    async fn sync_symbol(
        &self,
        accessor: &SheetAccessor<'_>,
        symbol: &Symbol,
    ) -> (SymbolOutcome, Option<StockRecord>) {
        let Some(record) =
            fetch_with_retry(self.source.as_ref(), symbol, self.retry.as_ref()).await
        else {
            return (
                SymbolOutcome::FetchFailed {
                    symbol: symbol.to_string(),
                },
                None,
            );
        };

        match accessor.is_duplicate(&record).await {
            Ok(true) => {
                info!(symbol = %record.symbol, date = %record.date, "row already stored");
                return (
                    SymbolOutcome::Skipped {
                        symbol: record.symbol,
                        date: record.date,
                    },
                    None,
                );
            }
            Ok(false) => {}
            Err(error) => return (sheet_failure(&record, &error), None),
        }

        if let Err(error) = accessor.append_row(&record).await {
            return (sheet_failure(&record, &error), None);
        }

        info!(symbol = %record.symbol, date = %record.date, "row added");
        let outcome = SymbolOutcome::Added {
            symbol: record.symbol.clone(),
            date: record.date.clone(),
        };
        (outcome, Some(record))
    }

    fn backup(&self, added: &[StockRecord]) -> BackupOutcome {
        let path = self.config.backup_path.display().to_string();
        match write_backup(&self.config.backup_path, added) {
            Ok(false) => BackupOutcome::NotNeeded,
            Ok(true) => BackupOutcome::Written {
                path,
                rows: added.len(),
            },
            Err(error) => {
                warn!(%error, "backup failed; rows were still appended to the sheet");
                BackupOutcome::Failed {
                    path,
                    error: error.to_string(),
                }
            }
        }
    }
}

fn sheet_failure(record: &StockRecord, error: &SheetError) -> SymbolOutcome {
    error!(
        symbol = %record.symbol,
        date = %record.date,
        %error,
        "sheet operation failed"
    );
    SymbolOutcome::SheetFailed {
        symbol: record.symbol.clone(),
        date: record.date.clone(),
        error: error.to_string(),
    }
}
