//! HTTP transport seam.
//!
//! The feed client only needs "GET this URL, honour this token". Production
//! code uses [`CurlTransport`]; tests substitute their own implementation.

mod curl_client;
mod parse;

use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

pub use curl_client::{CurlOptions, CurlTransport};

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Why a transport call produced no response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The cancellation token fired before or during the transfer.
    #[error("transfer aborted")]
    Aborted,
    /// Connection, DNS, TLS, or I/O failure.
    #[error("{0}")]
    NoResponse(String),
}

/// Asynchronous GET-only HTTP client.
pub trait Transport: Send + Sync {
    /// Fetch `url`. When `cancel` fires, an in-flight call must end with
    /// [`TransportError::Aborted`].
    fn get(
        &self,
        url: &Url,
        cancel: Option<&CancellationToken>,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}
