//! Map failures (and the caller's token) onto retry policy error kinds.

use tokio_util::sync::CancellationToken;

use super::policy::ErrorKind;

/// An error the retry loop knows how to classify.
pub trait RetryableError {
    /// Kind of this failure.
    fn kind(&self) -> ErrorKind;

    /// The error to return when the token fires while waiting between
    /// attempts.
    fn cancelled() -> Self;
}

/// Classify a failure, letting a fired token override the error's own kind.
pub fn classify<E: RetryableError>(e: &E, cancel: Option<&CancellationToken>) -> ErrorKind {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return ErrorKind::Cancelled;
    }
    e.kind()
}
