//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`StockRecord`] | Daily OHLCV quote as returned by the API |
//! | [`SheetRow`] | Positional row read back from the tracker tab |
//!
//! Rows are unique per `(date, symbol)` pair; see [`StockRecord::dedupe_key`].

mod record;
mod symbol;

pub use record::{SheetRow, StockRecord, HEADERS};
pub use symbol::Symbol;
