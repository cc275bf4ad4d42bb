use tracing::debug;

use crate::error::SheetError;
use crate::{SheetRow, StockRecord, HEADERS};

use super::SheetsApi;

/// Quotes a tab name for A1 notation: `Stock Tracker` becomes `'Stock Tracker'`.
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// Tracker rules over one tab: header row in `A1:G1`, data rows from row 2.
///
/// Every call reads the sheet afresh; nothing is cached between symbols.
pub struct SheetAccessor<'a> {
    api: &'a dyn SheetsApi,
    tab: String,
}

impl<'a> SheetAccessor<'a> {
    pub fn new(api: &'a dyn SheetsApi, tab: impl Into<String>) -> Self {
        Self {
            api,
            tab: tab.into(),
        }
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn range(&self, cells: &str) -> String {
        format!("{}!{}", quote_tab(&self.tab), cells)
    }

    /// Writes the canonical header row when the header range holds no value.
    /// Any returned cell counts as a value, whitespace included.
    /// Returns whether a write happened.
    pub async fn ensure_headers(&self) -> Result<bool, SheetError> {
        let range = self.range("A1:G1");
        let existing = self.api.get_values(&range).await?;

        let has_any_value = existing
            .iter()
            .flatten()
            .any(|cell| !cell.is_empty());
        if has_any_value {
            return Ok(false);
        }

        let header_row = HEADERS.iter().map(|header| (*header).to_owned()).collect();
        self.api.update_values(&range, vec![header_row]).await?;
        Ok(true)
    }

    /// Whether a data row with the record's `(date, symbol)` already exists.
    pub async fn is_duplicate(&self, record: &StockRecord) -> Result<bool, SheetError> {
        let rows = self.api.get_values(&self.range("A2:B")).await?;
        debug!(tab = %self.tab, rows = rows.len(), "scanned existing keys");

        Ok(rows
            .into_iter()
            .map(SheetRow::new)
            .any(|row| row.matches_key(record)))
    }

    pub async fn append_row(&self, record: &StockRecord) -> Result<(), SheetError> {
        self.api
            .append_values(&self.range("A:G"), vec![record.to_row()])
            .await
    }

    /// The last data row for `symbol` in read order (not necessarily the latest date).
    pub async fn last_row_for(&self, symbol: &str) -> Result<Option<SheetRow>, SheetError> {
        let rows = self.api.get_values(&self.range("A2:G")).await?;

        Ok(rows
            .into_iter()
            .map(SheetRow::new)
            .filter(|row| row.symbol() == symbol)
            .last())
    }
}
