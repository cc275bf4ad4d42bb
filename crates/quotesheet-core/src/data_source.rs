//! Quote source contract and its error type.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{StockRecord, Symbol};

/// Fetch-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success HTTP status.
    Unavailable,
    /// Upstream quota exhausted (HTTP 429 or an in-band `Note`/`Information` body).
    RateLimited,
    /// Body could not be decoded or the API rejected the request.
    InvalidResponse,
    /// Response decoded but carried no usable daily record.
    NoData,
}

/// Structured fetch error. Every kind is retried by [`crate::fetch_with_retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidResponse, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NoData, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

pub type SourceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<StockRecord, SourceError>> + Send + 'a>>;

/// Anything that can report the most recent daily record for a symbol.
pub trait DailyQuoteSource: Send + Sync {
    fn latest_daily<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a>;
}
