//! Spreadsheet access.
//!
//! [`SheetsApi`] is the raw values seam (one implementation talks to the
//! Google Sheets REST API, tests use in-memory fakes). [`SheetAccessor`]
//! layers the tracker's header, dedupe and append rules on top of it.

mod accessor;
mod client;

use std::future::Future;
use std::pin::Pin;

use crate::error::SheetError;

pub use accessor::{quote_tab, SheetAccessor};
pub use client::{GoogleSheetsClient, SHEETS_BASE_URL};

pub type SheetFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SheetError>> + Send + 'a>>;

/// Values operations against A1-notation ranges. Writes use `RAW` input.
pub trait SheetsApi: Send + Sync {
    /// Rows in the range; an empty range yields an empty vector.
    fn get_values<'a>(&'a self, range: &'a str) -> SheetFuture<'a, Vec<Vec<String>>>;

    /// Overwrites the range starting at its top-left cell.
    fn update_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()>;

    /// Appends rows after the last row of the table found in the range.
    fn append_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()>;
}
