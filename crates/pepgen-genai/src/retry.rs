//! Bounded retry with linear back-off.
//!
//! [`with_retry`] wraps any fallible async operation in a fixed attempt
//! budget. Back-off (`base × attempt`) is slept only after failures the
//! caller classifies as retryable; every failure consumes an attempt slot
//! either way, so a malformed response cannot spin the loop forever.

use std::future::Future;
use std::time::Duration;

/// Attempt budget and back-off base for one retried operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    /// Linear back-off base: the sleep after attempt `n` is `base × n`.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
        }
    }

    fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

/// Outcome of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success(T),
    /// All attempts failed; carries the last error observed.
    Exhausted(E),
}

impl<T, E> RetryOutcome<T, E> {
    /// Convert to `Option`, discarding the exhaustion error.
    pub fn success(self) -> Option<T> {
        match self {
            RetryOutcome::Success(v) => Some(v),
            RetryOutcome::Exhausted(_) => None,
        }
    }
}

/// Run `operation` up to `policy.max_attempts` times.
///
/// After a failed attempt with budget remaining, sleeps `base × attempt` if
/// `is_retryable(&err)` returns true, otherwise retries immediately. Returns
/// [`RetryOutcome::Exhausted`] with the final error once the budget is spent.
pub async fn with_retry<T, E, F, Fut, R>(
    policy: RetryPolicy,
    is_retryable: R,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return RetryOutcome::Success(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return RetryOutcome::Exhausted(err);
                }
                if is_retryable(&err) {
                    let delay = policy.backoff_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient generation failure — retrying after back-off"
                    );
                    tokio::time::sleep(delay).await;
                } else {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %err,
                        "generation failure — retrying immediately"
                    );
                }
                attempt += 1;
            }
        }
    }
}
