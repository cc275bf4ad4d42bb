use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use time::format_description::well_known::Iso8601;
use time::Date;

use crate::data_source::{DailyQuoteSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::throttling::RequestPacer;
use crate::{StockRecord, Symbol};

pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// `TIME_SERIES_DAILY` client returning the latest daily bar per symbol.
#[derive(Clone)]
pub struct AlphaVantageDaily {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    pacer: Option<RequestPacer>,
}

impl AlphaVantageDaily {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_BASE_URL),
            timeout_ms: 10_000,
            pacer: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = Some(pacer);
        self
    }

    fn daily_request(&self, symbol: &Symbol) -> HttpRequest {
        HttpRequest::get(&self.base_url)
            .with_query("function", "TIME_SERIES_DAILY")
            .with_query("symbol", symbol.as_str())
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_latest(&self, symbol: &Symbol) -> Result<StockRecord, SourceError> {
        if let Some(pacer) = &self.pacer {
            pacer.wait().await;
        }

        let response = self
            .http_client
            .execute(self.daily_request(symbol))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("alphavantage transport error: {}", e.message()))
            })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited(
                "alphavantage returned status 429",
            ));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        parse_latest_daily(symbol, &response.body)
    }
}

impl DailyQuoteSource for AlphaVantageDaily {
    fn latest_daily<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a> {
        Box::pin(self.fetch_latest(symbol))
    }
}

/// Extracts the most recent entry of a `TIME_SERIES_DAILY` body.
///
/// Date keys are parsed and the maximum is taken; the order of keys in the
/// payload is not relied on.
pub fn parse_latest_daily(symbol: &Symbol, body: &str) -> Result<StockRecord, SourceError> {
    let payload: DailySeriesResponse = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse alphavantage response: {e}"))
    })?;

    if let Some(message) = payload.error_message {
        return Err(SourceError::invalid_response(format!(
            "alphavantage rejected request: {message}"
        )));
    }
    if let Some(note) = payload.note.or(payload.information) {
        return Err(SourceError::rate_limited(format!(
            "alphavantage throttled request: {note}"
        )));
    }

    let series = payload.time_series.ok_or_else(|| {
        SourceError::no_data("no 'Time Series (Daily)' section in alphavantage response")
    })?;

    let (date, bar) = series
        .into_iter()
        .filter_map(|(key, bar)| {
            let parsed = Date::parse(&key, &Iso8601::DATE).ok()?;
            Some((parsed, key, bar))
        })
        .max_by_key(|(parsed, _, _)| *parsed)
        .map(|(_, key, bar)| (key, bar))
        .ok_or_else(|| {
            SourceError::no_data(format!("alphavantage returned no daily bars for {symbol}"))
        })?;

    Ok(StockRecord {
        date,
        symbol: symbol.as_str().to_owned(),
        open: bar.open,
        close: bar.close,
        high: bar.high,
        low: bar.low,
        volume: bar.volume,
    })
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    time_series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Error Message", default)]
    error_message: Option<String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
    #[serde(rename = "Information", default)]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}
