//! Failure taxonomy for feed requests.

use thiserror::Error;

use crate::record::ValidationError;
use crate::retry::{ErrorKind, RetryableError};
use crate::transport::TransportError;

/// Every way a feed request can fail.
///
/// The retry loop only looks at [`RetryableError::kind`]; the payloads are for
/// the caller.
#[derive(Debug, Error)]
pub enum ApodError {
    /// The caller's cancellation token fired before or during the request.
    #[error("request cancelled")]
    Cancelled,

    /// The transport did not produce a response (DNS, connect, reset, ...).
    #[error("network request failed to return a response: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    /// The response body was not well-formed JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The JSON did not have the record shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[source] url::ParseError),
}

impl ApodError {
    /// HTTP status for `Api` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApodError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApodError::Cancelled)
    }
}

impl From<TransportError> for ApodError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Aborted => ApodError::Cancelled,
            TransportError::NoResponse(msg) => ApodError::Network(msg),
        }
    }
}

impl RetryableError for ApodError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApodError::Cancelled => ErrorKind::Cancelled,
            ApodError::Network(_) => ErrorKind::Network,
            ApodError::Api { status, .. } => ErrorKind::Api(*status),
            ApodError::Decode(_) => ErrorKind::Decode,
            ApodError::Validation(_) => ErrorKind::Validation,
            ApodError::InvalidUrl(_) => ErrorKind::Other,
        }
    }

    fn cancelled() -> Self {
        ApodError::Cancelled
    }
}
