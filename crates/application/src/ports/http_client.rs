//! HTTP client port
//!
//! Transport only: the client sends what it is given and reports every
//! response it receives, whatever the status.

use async_trait::async_trait;
use thiserror::Error;

use sonde_domain::{RequestDescriptor, ResponseEnvelope};

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The target URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Host name resolution failed.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Anything else the transport reports.
    #[error("{0}")]
    Other(String),
}

/// Port for sending one HTTP request.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the normalized response.
    ///
    /// 4xx and 5xx responses are returned as `Ok`; deciding whether they
    /// count as failures is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError` when no response could be obtained.
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseEnvelope, HttpClientError>;
}
