//! Feed client: request, decode, validate, all under the retry policy.

mod query;

use serde_json::Value;
use std::fmt;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::SdkConfig;
use crate::error::ApodError;
use crate::record::{self, Record};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::{CurlTransport, Transport};

use query::{build_url, Params};

/// Typed APOD client.
///
/// Holds only immutable state, so one instance can serve concurrent calls.
/// Every public call takes an optional cancellation token: once it fires, no
/// new attempt or retry delay starts and the call fails with
/// [`ApodError::Cancelled`].
pub struct FeedClient<T = CurlTransport> {
    transport: T,
    base_url: Url,
    api_key: String,
    policy: RetryPolicy,
}

// Hand-written so the API key never reaches logs.
impl<T> fmt::Debug for FeedClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedClient")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl FeedClient<CurlTransport> {
    /// Client on the default libcurl transport.
    pub fn new(config: SdkConfig) -> Result<Self, ApodError> {
        Self::with_transport(config, CurlTransport::new())
    }
}

impl<T: Transport> FeedClient<T> {
    pub fn with_transport(config: SdkConfig, transport: T) -> Result<Self, ApodError> {
        let base_url = Url::parse(&config.base_url).map_err(ApodError::InvalidUrl)?;
        Ok(Self {
            transport,
            base_url,
            policy: config.retry_policy(),
            api_key: config.api_key,
        })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Entry for `date` (`YYYY-MM-DD`), or the server's "today" when `None`
    /// or empty.
    pub async fn get_one(
        &self,
        date: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Record, ApodError> {
        let params = Params::new().with("date", date.filter(|d| !d.is_empty()));
        let params = &params;
        run_with_retry(&self.policy, cancel, move || async move {
            let raw = self.fetch_raw(params, cancel).await?;
            Ok::<_, ApodError>(record::validate_one(&raw)?)
        })
        .await
    }

    /// `count` randomly chosen entries. The server decides the final length;
    /// an empty array is a valid answer.
    pub async fn get_random(
        &self,
        count: u32,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Record>, ApodError> {
        self.get_many(Params::new().with("count", Some(count)), cancel)
            .await
    }

    /// Entries from `start_date` to `end_date` inclusive, ascending by date.
    pub async fn get_range(
        &self,
        start_date: &str,
        end_date: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Record>, ApodError> {
        let params = Params::new()
            .with("start_date", Some(start_date))
            .with("end_date", Some(end_date));
        self.get_many(params, cancel).await
    }

    async fn get_many(
        &self,
        params: Params,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Record>, ApodError> {
        let params = &params;
        run_with_retry(&self.policy, cancel, move || async move {
            let raw = self.fetch_raw(params, cancel).await?;
            Ok::<_, ApodError>(record::validate_many(&raw)?)
        })
        .await
    }

    /// One attempt: check the token, GET, check status, decode JSON.
    async fn fetch_raw(
        &self,
        params: &Params,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value, ApodError> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(ApodError::Cancelled);
        }

        let url = build_url(&self.base_url, &self.api_key, params);
        tracing::debug!(endpoint = %self.base_url, ?params, "GET");

        let response = self.transport.get(&url, cancel).await?;
        if !response.is_success() {
            return Err(ApodError::Api {
                status: response.status,
                status_text: response.status_text,
            });
        }
        response.json().map_err(ApodError::Decode)
    }
}

#[cfg(test)]
mod tests;
