//! Retry policy.
//!
//! Fixed-delay, bounded retries for any async operation whose error type can
//! be classified. Cancellation always wins: a cancelled error or a fired
//! token stops the loop before the retry budget is even consulted.

mod classify;
mod policy;
mod run;

pub use classify::{classify, RetryableError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
