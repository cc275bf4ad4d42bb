use tracing::{error, warn};

use crate::data_source::DailyQuoteSource;
use crate::retry::RetryPolicy;
use crate::{StockRecord, Symbol};

/// Fetches the latest daily record, retrying every failure as the policy allows.
///
/// Exhausting the policy is not an error for the caller: the failure is logged
/// and `None` is returned so the run can move on to the next symbol.
pub async fn fetch_with_retry(
    source: &dyn DailyQuoteSource,
    symbol: &Symbol,
    policy: &dyn RetryPolicy,
) -> Option<StockRecord> {
    let mut failed_attempts = 0_u32;

    loop {
        let last_error = match source.latest_daily(symbol).await {
            Ok(record) => return Some(record),
            Err(error) => error,
        };
        failed_attempts = failed_attempts.saturating_add(1);

        match policy.next_delay(failed_attempts) {
            Some(delay) => {
                warn!(
                    %symbol,
                    attempt = failed_attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "quote fetch failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                error!(
                    %symbol,
                    attempts = failed_attempts,
                    error = %last_error,
                    "quote fetch gave up"
                );
                return None;
            }
        }
    }
}
