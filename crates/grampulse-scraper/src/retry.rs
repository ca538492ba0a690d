//! Retry with exponential back-off for the profile scraper.
//!
//! Only two error classes are worth another attempt: HTTP 401 (the
//! platform intermittently rejects scraper credentials and accepts the
//! same request moments later) and network-level failures. Every other
//! non-2xx status aborts the scrape immediately so a blocked account or
//! changed endpoint does not turn into a retry storm.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` should be retried after a back-off delay.
///
/// Retriable: [`ScraperError::AuthFailed`], [`ScraperError::Http`].
/// Everything else (404, other statuses, parse failures, pagination
/// guard) is propagated immediately.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::AuthFailed { .. } | ScraperError::Http(_))
}

/// Executes `operation` with exponential back-off retries on transient
/// errors: the wait before the n-th retry is
/// `backoff_base_secs * 2^(n-1)` seconds. With `max_retries = 3` the
/// operation runs at most 4 times; after exhaustion the last error is
/// returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }

                let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient scrape error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}
