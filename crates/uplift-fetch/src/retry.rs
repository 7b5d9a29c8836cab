use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Bounds for the retry loop.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total invocations of the operation, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each one after.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Failure classification for [`retry`].
#[derive(Debug)]
pub enum RetryError<E> {
    /// Retrying cannot help; the inner error is surfaced immediately
    /// without consuming further attempts.
    Permanent(E),
    /// Worth another attempt if the policy allows one.
    Transient(E),
}

/// Delay before retry number `retry_count` (0-indexed): `base * 2^retry_count`.
///
/// Saturates instead of overflowing for large counts or bases.
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry_count))
}

/// Run `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent.
///
/// Transient failures sleep for the current backoff delay before the next
/// attempt; exhausting the budget returns the last transient error.
/// The loop is iterative, so attempt counts never translate into stack
/// depth.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(RetryError::Permanent(e)) => return Err(e),
            Err(RetryError::Transient(e)) => {
                if attempt == max_attempts {
                    return Err(e);
                }
                let delay = retry_delay(attempt - 1, policy.initial_delay);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed; backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
