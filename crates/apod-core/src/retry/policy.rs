use std::time::Duration;

/// High-level classification of a failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Aborted through the caller's token. Never retried.
    Cancelled,
    /// Transport produced no response.
    Network,
    /// Server answered with a non-success status.
    Api(u16),
    /// Body was not JSON.
    Decode,
    /// Body was JSON of the wrong shape. Deterministic, but still retried
    /// like the transient kinds; see [`RetryPolicy`].
    Validation,
    /// Anything else.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-delay policy: up to `max_retries` extra attempts, `delay` apart.
///
/// Every kind except [`ErrorKind::Cancelled`] is retried, including
/// [`ErrorKind::Validation`]. A malformed payload will usually be malformed
/// again, so those retries are mostly wasted; the behaviour is kept so that a
/// server briefly serving a broken body still recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    ///
    /// Cancellation is checked before the retry budget.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if kind == ErrorKind::Cancelled {
            return RetryDecision::NoRetry;
        }
        if attempt > self.max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay)
    }

    /// Total attempts made when every attempt fails.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
