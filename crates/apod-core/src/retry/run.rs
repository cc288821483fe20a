//! Retry loop: run an async operation until success or the policy says stop.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::classify::{classify, RetryableError};
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds, fails with a non-retryable kind, or the policy
/// runs out of retries. Between attempts it waits `policy.delay`, racing the
/// wait against `cancel`.
///
/// The error returned is the last attempt's error, except when the token
/// fires during a wait, in which case it is `E::cancelled()`.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: Option<&CancellationToken>,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        tracing::debug!(attempt, max_attempts = policy.max_attempts(), "attempt start");
        let e = match f().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let kind = classify(&e, cancel);
        match policy.decide(attempt, kind) {
            RetryDecision::NoRetry => {
                if kind == ErrorKind::Cancelled {
                    tracing::info!("attempt {} cancelled: {}", attempt, e);
                } else {
                    tracing::warn!("giving up after {} attempt(s): {}", attempt, e);
                }
                return Err(e);
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!("attempt {} failed: {}; retrying in {:?}", attempt, e, delay);
                if !wait(delay, cancel).await {
                    tracing::info!("cancelled while waiting to retry");
                    return Err(E::cancelled());
                }
                attempt = attempt.saturating_add(1);
            }
        }
    }
}

/// Sleeps for `delay` unless the token fires first. Returns false when
/// cancelled. A zero delay still yields once to the scheduler.
async fn wait(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    if delay.is_zero() {
        tokio::task::yield_now().await;
        return !cancel.is_some_and(CancellationToken::is_cancelled);
    }
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => true,
            }
        }
        None => {
            tokio::time::sleep(delay).await;
            true
        }
    }
}
