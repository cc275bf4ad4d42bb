use serde::{Deserialize, Serialize};

/// Canonical column order of the tracker tab.
pub const HEADERS: [&str; 7] = ["Date", "Symbol", "Open", "Close", "High", "Low", "Volume"];

/// One daily OHLCV quote, kept as the exact strings the API returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub date: String,
    pub symbol: String,
    pub open: String,
    pub close: String,
    pub high: String,
    pub low: String,
    pub volume: String,
}

impl StockRecord {
    /// The `(date, symbol)` pair that must be unique across data rows.
    pub fn dedupe_key(&self) -> (&str, &str) {
        (self.date.as_str(), self.symbol.as_str())
    }

    /// Cells in [`HEADERS`] order.
    pub fn to_row(&self) -> Vec<String> {
        HEADERS
            .iter()
            .map(|header| self.field(header).unwrap_or_default().to_owned())
            .collect()
    }

    /// Looks a field up by header name, ignoring case.
    pub fn field(&self, header: &str) -> Option<&str> {
        let value = match header.to_ascii_lowercase().as_str() {
            "date" => &self.date,
            "symbol" => &self.symbol,
            "open" => &self.open,
            "close" => &self.close,
            "high" => &self.high,
            "low" => &self.low,
            "volume" => &self.volume,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// A positional row read back from the sheet.
///
/// The Sheets API trims trailing empty cells, so lookups past the end yield `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRow(Vec<String>);

impl SheetRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cell(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn date(&self) -> &str {
        self.cell(0)
    }

    pub fn symbol(&self) -> &str {
        self.cell(1)
    }

    pub fn matches_key(&self, record: &StockRecord) -> bool {
        (self.date(), self.symbol()) == record.dedupe_key()
    }
}

impl From<Vec<String>> for SheetRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}
