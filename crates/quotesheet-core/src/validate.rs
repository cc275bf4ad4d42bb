//! Checks that the sheet's last row for a symbol matches what the API reports now.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::data_source::DailyQuoteSource;
use crate::error::TrackerError;
use crate::sheets::SheetAccessor;
use crate::{SheetRow, StockRecord, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Validation {
    Match {
        symbol: String,
        date: String,
    },
    Mismatch {
        symbol: String,
        date: String,
        /// Header names of the columns that differ.
        fields: Vec<&'static str>,
    },
    InsufficientData {
        symbol: String,
        reason: String,
    },
}

impl Validation {
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

impl Display for Validation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match { symbol, date } => {
                write!(f, "Sheet matches API data for {symbol} on {date}")
            }
            Self::Mismatch { symbol, date, .. } => write!(
                f,
                "Mismatch: Sheet row does not match API data for {symbol} on {date}"
            ),
            Self::InsufficientData { .. } => f.write_str("Not enough data to validate."),
        }
    }
}

/// Columns of `row` that disagree with `api`.
///
/// Prices are equal when they round to the same cent, volume
/// compares as an integer, date and symbol compare exactly. A value that
/// does not parse as a number never matches.
pub fn differing_fields(api: &StockRecord, row: &SheetRow) -> Vec<&'static str> {
    let mut fields = Vec::new();

    if row.cell(0) != api.date {
        fields.push("Date");
    }
    if row.cell(1) != api.symbol {
        fields.push("Symbol");
    }

    let prices = [
        ("Open", 2, &api.open),
        ("Close", 3, &api.close),
        ("High", 4, &api.high),
        ("Low", 5, &api.low),
    ];
    for (name, index, expected) in prices {
        if !same_cents(row.cell(index), expected) {
            fields.push(name);
        }
    }

    if !same_volume(row.cell(6), &api.volume) {
        fields.push("Volume");
    }
    fields
}

fn same_cents(stored: &str, fetched: &str) -> bool {
    match (parse_price(stored), parse_price(fetched)) {
        (Some(a), Some(b)) => cents(a) == cents(b),
        _ => false,
    }
}

/// Rounds to whole cents with ties away from zero, so `190.125` becomes `19013`.
fn cents(price: f64) -> f64 {
    (price * 100.0).round()
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn same_volume(stored: &str, fetched: &str) -> bool {
    match (parse_volume(stored), parse_volume(fetched)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Integer part of a volume cell; `"1000000.0"` reads as `1000000`.
fn parse_volume(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let integer_part = trimmed.split_once('.').map_or(trimmed, |(whole, _)| whole);
    integer_part.parse().ok()
}

/// Fetches the API's latest record once (no retry) and compares it to the
/// last stored row for `symbol`. Sheet read failures are returned as errors.
pub async fn validate_symbol(
    source: &dyn DailyQuoteSource,
    accessor: &SheetAccessor<'_>,
    symbol: &Symbol,
) -> Result<Validation, TrackerError> {
    let fetched = source.latest_daily(symbol).await;
    let stored = accessor.last_row_for(symbol.as_str()).await?;

    let api = match fetched {
        Ok(record) => record,
        Err(error) => {
            tracing::error!(%symbol, %error, "could not fetch API data for validation");
            return Ok(Validation::InsufficientData {
                symbol: symbol.to_string(),
                reason: format!("api fetch failed: {error}"),
            });
        }
    };
    let Some(row) = stored else {
        return Ok(Validation::InsufficientData {
            symbol: symbol.to_string(),
            reason: format!("no row for {symbol} in tab '{}'", accessor.tab()),
        });
    };

    let fields = differing_fields(&api, &row);
    if fields.is_empty() {
        Ok(Validation::Match {
            symbol: api.symbol,
            date: api.date,
        })
    } else {
        Ok(Validation::Mismatch {
            symbol: api.symbol,
            date: api.date,
            fields,
        })
    }
}
