//! Typed client for the Astronomy Picture of the Day feed.
//!
//! Requests go through an injectable [`transport::Transport`], responses are
//! validated into [`record::Record`]s, and every public call is wrapped in a
//! fixed-delay [`retry`] loop that stops as soon as the caller's
//! cancellation token fires.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod retry;
pub mod transport;

pub use client::FeedClient;
pub use config::SdkConfig;
pub use error::ApodError;
pub use record::{MediaType, Record};
pub use tokio_util::sync::CancellationToken;
