//! Retry with exponential back-off and jitter for portal fetches.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors. Non-transient errors — including
//! [`FetchError::SessionInvalid`], which must abort the whole plan — are
//! returned immediately without any retry.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`FetchError::RateLimited`] — the portal asked us to back off.
/// - [`FetchError::Http`] for timeouts, connect failures, and 5xx responses.
///
/// **Not retriable (returned immediately):**
/// - [`FetchError::SessionInvalid`] — no later attempt can succeed either.
/// - [`FetchError::InvalidQuery`] — the query itself is wrong.
/// - [`FetchError::Format`] — malformed response; retrying won't fix it.
/// - [`FetchError::Http`] for non-5xx HTTP statuses.
#[must_use]
pub fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } => true,
        FetchError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        FetchError::SessionInvalid { .. }
        | FetchError::InvalidQuery { .. }
        | FetchError::Format { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 60 s. A rate-limit error carrying a `Retry-After`
/// hint raises the next delay to at least that long (still capped).
/// Non-retriable errors are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
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
                let delay_ms = backoff_delay_ms(attempt, backoff_base_ms, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient fetch error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

const MAX_DELAY_MS: u64 = 60_000;

/// Exponential delay with ±25% jitter, floored by the server's `Retry-After`
/// hint when the error carries one, capped at [`MAX_DELAY_MS`].
fn backoff_delay_ms(attempt: u32, backoff_base_ms: u64, err: &FetchError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    match err {
        FetchError::RateLimited { retry_after_secs } => jittered
            .max(retry_after_secs.saturating_mul(1_000))
            .min(MAX_DELAY_MS),
        _ => jittered,
    }
}
