use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::AccessToken;
use crate::error::SheetError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};

use super::{SheetFuture, SheetsApi};

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets v4 `values` client for a single spreadsheet.
///
/// A client holding a read-only token rejects writes locally.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http_client: Arc<dyn HttpClient>,
    spreadsheet_id: String,
    token: AccessToken,
    base_url: String,
}

impl GoogleSheetsClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        spreadsheet_id: impl Into<String>,
        token: AccessToken,
    ) -> Self {
        Self {
            http_client,
            spreadsheet_id: spreadsheet_id.into(),
            token,
            base_url: String::from(SHEETS_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/{}/values/{}{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range),
            suffix
        )
    }

    fn ensure_writable(&self, range: &str) -> Result<(), SheetError> {
        if self.token.scope().allows_writes() {
            Ok(())
        } else {
            Err(SheetError::ReadOnly {
                range: range.to_owned(),
            })
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SheetError> {
        let response = self
            .http_client
            .execute(request.with_bearer_token(self.token.value()))
            .await
            .map_err(|e| SheetError::Transport(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(SheetError::Status {
                status: response.status,
                message: google_error_message(&response.body),
            });
        }
        Ok(response)
    }

    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let response = self.send(HttpRequest::get(self.values_url(range, ""))).await?;
        let payload: ValueRange = serde_json::from_str(&response.body)
            .map_err(|e| SheetError::Decode(e.to_string()))?;

        debug!(range, rows = payload.values.len(), "read sheet range");
        Ok(payload
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn update(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        self.ensure_writable(range)?;
        let request = HttpRequest::put(self.values_url(range, ""))
            .with_query("valueInputOption", "RAW")
            .with_json_body(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            }));
        self.send(request).await?;
        debug!(range, "updated sheet range");
        Ok(())
    }

    async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        self.ensure_writable(range)?;
        let count = rows.len();
        let request = HttpRequest::post(self.values_url(range, ":append"))
            .with_query("valueInputOption", "RAW")
            .with_json_body(&json!({
                "majorDimension": "ROWS",
                "values": rows,
            }));
        self.send(request).await?;
        debug!(range, rows = count, "appended sheet rows");
        Ok(())
    }
}

impl SheetsApi for GoogleSheetsClient {
    fn get_values<'a>(&'a self, range: &'a str) -> SheetFuture<'a, Vec<Vec<String>>> {
        Box::pin(self.read(range))
    }

    fn update_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()> {
        Box::pin(self.update(range, rows))
    }

    fn append_values<'a>(&'a self, range: &'a str, rows: Vec<Vec<String>>) -> SheetFuture<'a, ()> {
        Box::pin(self.append(range, rows))
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the raw body.
fn google_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Scope;
    use crate::http_client::{HttpError, HttpFuture, HttpMethod};
    use std::sync::Mutex;

    struct ScriptedHttpClient {
        response: HttpResponse,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: HttpResponse::new(status, body),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response: Result<HttpResponse, HttpError> = Ok(self.response.clone());
            Box::pin(async move { response })
        }
    }

    fn client(http: Arc<ScriptedHttpClient>, scope: Scope) -> GoogleSheetsClient {
        GoogleSheetsClient::new(http, "sheet-123", AccessToken::new("tok", scope))
            .with_base_url("https://sheets.test/v4/spreadsheets")
    }

    #[tokio::test]
    async fn get_values_stringifies_cells_and_sends_bearer_token() {
        let http = ScriptedHttpClient::replying(
            200,
            r#"{"range":"'StockTracker'!A2:B3","values":[["2024-06-10","AAPL"],[45000,true]]}"#,
        );
        let sheets = client(http.clone(), Scope::ReadOnly);

        let rows = sheets
            .get_values("'StockTracker'!A2:B")
            .await
            .expect("read should succeed");

        assert_eq!(rows, vec![vec!["2024-06-10", "AAPL"], vec!["45000", "true"]]);

        let requests = http.requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(
            requests[0].url,
            "https://sheets.test/v4/spreadsheets/sheet-123/values/%27StockTracker%27%21A2%3AB"
        );
        assert_eq!(
            requests[0].headers.get("authorization").map(String::as_str),
            Some("Bearer tok")
        );
    }

    #[tokio::test]
    async fn empty_range_without_values_key_reads_as_no_rows() {
        let http = ScriptedHttpClient::replying(200, r#"{"range":"'StockTracker'!A1:G1"}"#);
        let rows = client(http, Scope::ReadWrite)
            .get_values("'StockTracker'!A1:G1")
            .await
            .expect("read should succeed");

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn append_posts_raw_rows() {
        let http = ScriptedHttpClient::replying(200, "{}");
        let sheets = client(http.clone(), Scope::ReadWrite);

        sheets
            .append_values("'StockTracker'!A:G", vec![vec![String::from("x")]])
            .await
            .expect("append should succeed");

        let request = &http.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("%27StockTracker%27%21A%3AG:append?valueInputOption=RAW"));
        let body: Value =
            serde_json::from_str(request.body.as_deref().expect("body")).expect("json body");
        assert_eq!(body["values"], json!([["x"]]));
    }

    #[tokio::test]
    async fn read_only_client_refuses_writes_without_calling_api() {
        let http = ScriptedHttpClient::replying(200, "{}");
        let sheets = client(http.clone(), Scope::ReadOnly);

        let error = sheets
            .update_values("'StockTracker'!A1:G1", vec![])
            .await
            .expect_err("writes need read-write scope");

        assert!(matches!(error, SheetError::ReadOnly { .. }));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let http = ScriptedHttpClient::replying(
            400,
            r#"{"error":{"code":400,"message":"Unable to parse range: 'Nope'!A1:G1","status":"INVALID_ARGUMENT"}}"#,
        );

        let error = client(http, Scope::ReadWrite)
            .get_values("'Nope'!A1:G1")
            .await
            .expect_err("must fail");

        assert_eq!(
            error,
            SheetError::Status {
                status: 400,
                message: String::from("Unable to parse range: 'Nope'!A1:G1"),
            }
        );
    }
}
