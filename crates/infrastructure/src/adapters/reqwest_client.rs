//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the runner.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use sonde_application::ports::{HttpClient, HttpClientError};
use sonde_domain::{Headers, HttpMethod, RequestDescriptor, ResponseEnvelope};
use tracing::debug;

use crate::config::RunnerConfig;

/// Redirect limit applied by the client.
const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Joins request paths onto the configured base URL and applies the
/// client-level timeout. Every HTTP response, 4xx and 5xx included, comes
/// back as an envelope.
pub struct ReqwestHttpClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &RunnerConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a client around a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, config: &RunnerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error_chain(error))
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Copies response headers, joining repeated ones with `, `.
///
/// Values that are not visible ASCII are decoded as lossy UTF-8.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }
    headers
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseEnvelope, HttpClientError> {
        let url = request.url_on(&self.base_url);
        let parsed_url =
            Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), parsed_url);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?;

        let duration = start.elapsed();
        debug!(url = %url, status, bytes = body.len(), ?duration, "received response");

        Ok(ResponseEnvelope::from_bytes(status, headers, &body, duration))
    }
}
