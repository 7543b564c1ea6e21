//! Send use case
//!
//! Applies the `fail_on_status_code` policy on top of the transport port.

use std::sync::Arc;

use sonde_domain::{RequestDescriptor, ResponseEnvelope};

use crate::error::RequestFailure;
use crate::ports::HttpClient;

/// Use case for sending one request.
///
/// # Example
///
/// ```ignore
/// let client = ReqwestHttpClient::new(&config)?;
/// let use_case = ExecuteRequest::new(Arc::new(client));
///
/// let request = RequestDescriptor::new(HttpMethod::Get, "/posts/1");
/// let response = use_case.send(&request, true).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Sends the request.
    ///
    /// With `fail_on_status_code` unset every response is returned, so error
    /// statuses can be asserted on deliberately. No retries.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailure::Transport` when no response arrived and
    /// `RequestFailure::Status` for a 4xx/5xx response while
    /// `fail_on_status_code` is set.
    pub async fn send(
        &self,
        request: &RequestDescriptor,
        fail_on_status_code: bool,
    ) -> Result<ResponseEnvelope, RequestFailure> {
        let response = self.client.execute(request).await?;

        if fail_on_status_code && response.is_error() {
            return Err(RequestFailure::Status(Box::new(response)));
        }

        Ok(response)
    }
}

impl<C: HttpClient> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}
