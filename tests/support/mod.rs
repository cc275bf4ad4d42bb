//! In-memory collaborators shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use quotesheet_core::{
    DailyQuoteSource, HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, SheetError,
    SheetFuture, SheetsApi, SourceError, SourceFuture, StockRecord, Symbol,
};

pub fn record(symbol: &str, date: &str) -> StockRecord {
    StockRecord {
        date: date.to_owned(),
        symbol: symbol.to_owned(),
        open: String::from("190.0000"),
        close: String::from("192.5000"),
        high: String::from("193.0000"),
        low: String::from("189.5000"),
        volume: String::from("1000000"),
    }
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_owned()).collect()
}

pub fn header_row() -> Vec<String> {
    row(&quotesheet_core::HEADERS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Get(String),
    Update(String, Vec<Vec<String>>),
    Append(String, Vec<Vec<String>>),
}

impl SheetCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Get(_))
    }
}

/// A single tab held as a grid, addressed by the handful of ranges the tracker uses.
#[derive(Default)]
pub struct InMemorySheets {
    rows: Mutex<Vec<Vec<String>>>,
    calls: Mutex<Vec<SheetCall>>,
    failing_append_symbols: Mutex<Vec<String>>,
    fail_reads: Mutex<bool>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        let sheets = Self::default();
        *sheets.rows.lock().expect("rows lock") = rows;
        sheets
    }

    /// Appends of a row for `symbol` fail with a transport error.
    pub fn fail_appends_for(self, symbol: &str) -> Self {
        self.failing_append_symbols
            .lock()
            .expect("failure lock")
            .push(symbol.to_owned());
        self
    }

    pub fn fail_reads(self) -> Self {
        *self.fail_reads.lock().expect("failure lock") = true;
        self
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().expect("rows lock").clone()
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn writes(&self) -> Vec<SheetCall> {
        self.calls().into_iter().filter(SheetCall::is_write).collect()
    }

    fn record_call(&self, call: SheetCall) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn cells(range: &str) -> &str {
        range.rsplit_once('!').map_or(range, |(_, cells)| cells)
    }

    fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        self.record_call(SheetCall::Get(range.to_owned()));
        if *self.fail_reads.lock().expect("failure lock") {
            return Err(SheetError::Status {
                status: 503,
                message: String::from("backend unavailable"),
            });
        }

        let rows = self.rows.lock().expect("rows lock");
        let values = match Self::cells(range) {
            "A1:G1" => rows.first().cloned().into_iter().collect(),
            "A2:B" => rows
                .iter()
                .skip(1)
                .map(|row| row.iter().take(2).cloned().collect())
                .collect(),
            "A2:G" => rows.iter().skip(1).cloned().collect(),
            other => panic!("unexpected read range {other}"),
        };
        Ok(values)
    }

    fn update(&self, range: &str, values: Vec<Vec<String>>) -> Result<(), SheetError> {
        self.record_call(SheetCall::Update(range.to_owned(), values.clone()));
        assert_eq!(Self::cells(range), "A1:G1", "only the header row is updated");

        let mut rows = self.rows.lock().expect("rows lock");
        let header = values.into_iter().next().unwrap_or_default();
        if rows.is_empty() {
            rows.push(header);
        } else {
            rows[0] = header;
        }
        Ok(())
    }

    fn append(&self, range: &str, values: Vec<Vec<String>>) -> Result<(), SheetError> {
        self.record_call(SheetCall::Append(range.to_owned(), values.clone()));

        let failing = self.failing_append_symbols.lock().expect("failure lock");
        let blocked = values
            .iter()
            .any(|row| row.get(1).is_some_and(|symbol| failing.contains(symbol)));
        if blocked {
            return Err(SheetError::Transport(String::from("connection reset")));
        }

        self.rows.lock().expect("rows lock").extend(values);
        Ok(())
    }
}

impl SheetsApi for InMemorySheets {
    fn get_values<'a>(&'a self, range: &'a str) -> SheetFuture<'a, Vec<Vec<String>>> {
        Box::pin(async move { self.read(range) })
    }

    fn update_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()> {
        Box::pin(async move { self.update(range, rows) })
    }

    fn append_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()> {
        Box::pin(async move { self.append(range, rows) })
    }
}

/// Replays scripted results per symbol; an exhausted script fails as unavailable.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, VecDeque<Result<StockRecord, SourceError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, symbol: &str, results: Vec<Result<StockRecord, SourceError>>) -> Self {
        self.scripts
            .lock()
            .expect("script lock")
            .insert(symbol.to_owned(), results.into());
        self
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|called| called.as_str() == symbol)
            .count()
    }

    fn next(&self, symbol: &Symbol) -> Result<StockRecord, SourceError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(symbol.as_str().to_owned());

        self.scripts
            .lock()
            .expect("script lock")
            .get_mut(symbol.as_str())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(SourceError::unavailable("script exhausted")))
    }
}

impl DailyQuoteSource for ScriptedSource {
    fn latest_daily<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a> {
        Box::pin(async move { self.next(symbol) })
    }
}

/// Replays HTTP responses in order and records every request.
#[derive(Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        self.requests.lock().expect("requests lock").push(request);
        let response = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
        Box::pin(async move { response })
    }
}

pub fn daily_series_body(entries: &[(&str, &str)]) -> String {
    let series: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(date, close)| {
            (
                (*date).to_owned(),
                serde_json::json!({
                    "1. open": "190.0000",
                    "2. high": "193.0000",
                    "3. low": "189.5000",
                    "4. close": close,
                    "5. volume": "1000000",
                }),
            )
        })
        .collect();

    serde_json::json!({
        "Meta Data": { "2. Symbol": "AAPL" },
        "Time Series (Daily)": series,
    })
    .to_string()
}
