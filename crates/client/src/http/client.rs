//! Retrying HTTP transport
//!
//! Thin wrapper around a shared reqwest client. Responses come back as-is
//! whatever their status; the only thing decided here is whether a failed
//! attempt is worth repeating, and that decision is delegated to
//! [`ApiError::should_retry`] so the transport and the endpoint layer agree
//! on what counts as transient.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use salonkit_domain::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS};
use tracing::{debug, warn};

use crate::api::ApiError;

/// HTTP transport with exponential backoff on transient failures
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a transport
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Begin a request against the given URL
    pub fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send a request, repeating transient failures up to the attempt budget
    ///
    /// The request body must be buffered (cloneable) or no retry is possible.
    /// A response is returned whatever its status; only the retry decision
    /// inspects it.
    ///
    /// # Errors
    /// Returns the classified [`ApiError`] once attempts are exhausted or the
    /// failure is not one [`ApiError::should_retry`] allows repeating.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        for attempt in 1..=self.max_attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    ApiError::Config(
                        "request body cannot be buffered, so it cannot be retried".to_string(),
                    )
                })?
                .build()?;

            let url = request.url().clone();
            debug!(attempt, url = %url, "Sending request");

            match self.inner.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && attempt < self.max_attempts {
                        let transient = ApiError::Server(format!("{url} returned {status}"));
                        if transient.should_retry() {
                            warn!(attempt, %status, url = %url, "Server error, backing off");
                            self.pause(attempt).await;
                            continue;
                        }
                    }
                    debug!(attempt, %status, url = %url, "Request completed");
                    return Ok(response);
                }
                Err(err) => {
                    let classified = ApiError::from(err);
                    if attempt < self.max_attempts && classified.should_retry() {
                        warn!(attempt, url = %url, error = %classified, "Transport failure, backing off");
                        self.pause(attempt).await;
                        continue;
                    }
                    return Err(classified);
                }
            }
        }

        Err(ApiError::Network("request was given no attempts".to_string()))
    }

    async fn pause(&self, attempt: usize) {
        let exponent = attempt.saturating_sub(1).min(8) as u32;
        let delay = self.base_backoff.saturating_mul(1 << exponent);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`]
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempt budget (initial try + retries), clamped to at least 1
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Backoff before the first retry; doubles on each further retry
    #[must_use]
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// User-Agent header for all requests
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the transport
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the underlying client cannot be built.
    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut inner = reqwest::Client::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            inner = inner.user_agent(agent);
        }
        let inner = inner
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;

        Ok(HttpClient {
            inner,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quick_client(attempts: usize) -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(attempts)
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn recovers_from_transient_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = quick_client(3);
        let url = format!("{}/services", server.uri());
        let response = client.send(client.request(Method::GET, &url)).await.expect("response");

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_the_last_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = quick_client(2);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        // The caller still gets the response and maps the status itself
        assert_eq!(response.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn conflict_responses_are_never_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reservations"))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        let client = quick_client(3);
        let url = format!("{}/reservations", server.uri());
        let request = client.request(Method::POST, &url).json(&json!({"coiffeuseId": "sty1"}));
        let response = client.send(request).await.expect("response");

        assert_eq!(response.status().as_u16(), 409);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refused_connections_surface_as_network_errors() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener); // free the port so the connection is refused

        let client = quick_client(2);
        let result = client.send(client.request(Method::GET, &url)).await;

        match result {
            Err(err @ ApiError::Network(_)) => assert!(err.should_retry()),
            other => panic!("expected a network error, got {other:?}"),
        }
    }
}
