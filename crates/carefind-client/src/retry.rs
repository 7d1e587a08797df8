//! Retry with exponential back-off and jitter for facility API requests.
//!
//! Only transient failures are retried. A 404 or an undecodable body is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** network timeouts, connection failures and HTTP 5xx.
///
/// **Not retriable:** [`ClientError::NotFound`], 4xx
/// [`ClientError::UnexpectedStatus`], [`ClientError::Deserialize`] and
/// [`ClientError::InvalidBaseUrl`].
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Upper bound on a single back-off sleep.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Sleep before retry number `retry` (1-based): `base_ms × 2^(retry-1)`,
/// capped at [`MAX_DELAY`], then scaled by `jitter` in `[0.75, 1.25)`.
fn backoff_delay(retry: u32, base_ms: u64, jitter: f64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal = Duration::from_millis(base_ms.saturating_mul(1 << exponent)).min(MAX_DELAY);
    nominal.mul_f64(jitter.clamp(0.75, 1.25))
}

/// Runs `operation`, retrying up to `max_retries` more times while it fails
/// with a transient error.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        retry += 1;
        let delay = backoff_delay(retry, backoff_base_ms, 0.75 + rand::random::<f64>() * 0.5);
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient facility API error; backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
