//! libcurl-backed transport.
//!
//! Each request runs one `curl::easy::Easy` transfer on tokio's blocking pool.
//! The progress callback polls the cancellation token, so a fired token
//! aborts the transfer within about a second even when no bytes are moving.

use std::str;
use std::time::Duration;

use curl::easy::Easy;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::parse::{canonical_reason, parse_status_line};
use super::{Transport, TransportError, TransportResponse};

/// Connection tuning for [`CurlTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit. `None` leaves bounding latency to the caller's
    /// cancellation token.
    pub timeout: Option<Duration>,
    pub max_redirections: u32,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: None,
            max_redirections: 10,
        }
    }
}

/// Production [`Transport`] on libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CurlOptions) -> Self {
        Self { options }
    }
}

impl Transport for CurlTransport {
    async fn get(
        &self,
        url: &Url,
        cancel: Option<&CancellationToken>,
    ) -> Result<TransportResponse, TransportError> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(TransportError::Aborted);
        }
        let url = url.to_string();
        let cancel = cancel.cloned();
        let options = self.options;
        tokio::task::spawn_blocking(move || perform_get(&url, cancel.as_ref(), options))
            .await
            .map_err(|e| TransportError::NoResponse(format!("transport task failed: {}", e)))?
    }
}

fn no_response(e: curl::Error) -> TransportError {
    TransportError::NoResponse(e.to_string())
}

fn configure(easy: &mut Easy, url: &str, options: CurlOptions) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirections)?;
    easy.connect_timeout(options.connect_timeout)?;
    if let Some(t) = options.timeout {
        easy.timeout(t)?;
    }
    easy.useragent(concat!("apod/", env!("CARGO_PKG_VERSION")))?;
    // Empty string = every encoding libcurl was built with.
    easy.accept_encoding("")?;
    // Needed for progress_function to be called at all.
    easy.progress(true)?;
    Ok(())
}

/// Blocking GET. Runs on the current thread.
fn perform_get(
    url: &str,
    cancel: Option<&CancellationToken>,
    options: CurlOptions,
) -> Result<TransportResponse, TransportError> {
    let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = Easy::new();
    configure(&mut easy, url, options).map_err(no_response)?;

    let outcome = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(no_response)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(no_response)?;
        transfer
            .progress_function(|_, _, _, _| !is_cancelled())
            .map_err(no_response)?;
        transfer.perform()
    };

    if let Err(e) = outcome {
        if e.is_aborted_by_callback() || is_cancelled() {
            tracing::debug!("transfer aborted by cancellation token");
            return Err(TransportError::Aborted);
        }
        return Err(no_response(e));
    }

    let code = easy.response_code().map_err(no_response)?;
    if code == 0 {
        return Err(TransportError::NoResponse(
            "no HTTP response received".to_string(),
        ));
    }
    let status = u16::try_from(code)
        .map_err(|_| TransportError::NoResponse(format!("invalid HTTP status {}", code)))?;
    let status_text = parse_status_line(&headers)
        .map(|(_, reason)| reason)
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| canonical_reason(status).to_string());

    tracing::debug!(status, bytes = body.len(), "GET complete");

    Ok(TransportResponse {
        status,
        status_text,
        body,
    })
}
