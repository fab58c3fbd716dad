//! OPTIONS probe client with timeout and error handling.

use std::time::Duration;

use thiserror::Error;

use crate::catalog::HttpMethod;
use crate::config::AutodetectConfig;

/// Errors that can occur while autodetecting allowed methods.
#[derive(Debug, Error)]
pub enum AutodetectError {
    /// The request could not be sent or the connection failed.
    #[error("request error: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response carried no usable Allow header.
    #[error("response is missing the Allow header")]
    MissingAllow,
}

/// Result type for autodetect operations.
pub type AutodetectResult<T> = Result<T, AutodetectError>;

/// Parse an `Allow` header value into known methods.
///
/// The header is comma-space delimited; surrounding whitespace is tolerated
/// and unknown tokens are skipped.
pub fn parse_allow(raw: &str) -> Vec<HttpMethod> {
    raw.split(',')
        .map(str::trim)
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// HTTP client issuing the OPTIONS probes.
#[derive(Clone)]
pub struct AutodetectClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl AutodetectClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: &AutodetectConfig) -> AutodetectResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AutodetectError::Request(e.to_string()))?;
        Ok(Self {
            http,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Probe a URL with an OPTIONS request and return the allowed methods.
    pub async fn probe(&self, url: &str) -> AutodetectResult<Vec<HttpMethod>> {
        let response = self
            .http
            .request(reqwest::Method::OPTIONS, url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AutodetectError::Timeout(self.timeout_secs)
                } else {
                    AutodetectError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutodetectError::Status(status));
        }

        let allow = response
            .headers()
            .get(reqwest::header::ALLOW)
            .and_then(|v| v.to_str().ok())
            .ok_or(AutodetectError::MissingAllow)?;

        let allowed = parse_allow(allow);
        tracing::debug!(%url, allow, methods = allowed.len(), "autodetect probe succeeded");
        Ok(allowed)
    }
}

impl std::fmt::Debug for AutodetectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutodetectClient")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
