//! Bounded fixed-delay retry for ERP calls.
//!
//! [`retry_with_delay`] wraps a fallible async operation and retries on
//! transport-level failures only. Payload-level errors are returned
//! immediately; re-sending a quota-exceeded call would burn more of the
//! daily allowance.

use std::future::Future;
use std::time::Duration;

use crate::error::ErpError;

/// Returns `true` for errors that are worth retrying after a delay.
///
/// Only [`ErpError::Http`] qualifies; the ERP's transport layer is flaky
/// enough that timeouts and 5xx responses regularly succeed on a re-send.
pub(crate) fn is_retriable(err: &ErpError) -> bool {
    matches!(err, ErpError::Http(_))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors, sleeping `delay_ms` between attempts.
///
/// The delay is fixed rather than exponential: the upstream contract is a
/// small fixed budget of evenly spaced re-sends, not congestion avoidance.
/// With `max_retries = 5` the operation runs at most 6 times.
pub(crate) async fn retry_with_delay<T, F, Fut>(
    max_retries: u32,
    delay_ms: u64,
    mut operation: F,
) -> Result<T, ErpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ErpError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient ERP error, retrying after delay"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
