//! API client with bearer authentication and 401 recovery
//!
//! Request engine for the salon backend: attaches the session's access
//! token, maps response statuses to typed errors, and on a 401 forces one
//! token refresh followed by a single retry before giving up.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use salonkit_domain::ClientConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use crate::http::HttpClient;
use crate::session::SessionManager;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the backend API (e.g., "https://api.example.com")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// Total HTTP attempts for retryable failures
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
        }
    }
}

impl From<&ClientConfig> for ApiClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_attempts: config.max_attempts,
        }
    }
}

/// API client over the shared session
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    session: Arc<SessionManager>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn new(config: ApiClientConfig, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .build()?;

        Ok(Self { http_client: Arc::new(http_client), session, config })
    }

    /// The configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a GET request against an authenticated endpoint
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be
    /// deserialized.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// Execute a POST request against an authenticated endpoint
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be
    /// deserialized.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {e}")))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Execute a PATCH request against an authenticated endpoint
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be
    /// deserialized.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {e}")))?;
        self.execute(Method::PATCH, path, Some(body)).await
    }

    /// Execute a DELETE request against an authenticated endpoint
    ///
    /// # Errors
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(Method::DELETE, path, None).await
    }

    /// Health check for the API
    ///
    /// Unauthenticated; returns `true` if the API is reachable and healthy.
    ///
    /// # Errors
    /// Returns error only on transport failure or timeout.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/health", self.config.base_url);
        debug!(url = %url, "Health check");

        let timeout = Duration::from_secs(5);
        let request = self.http_client.request(Method::GET, &url);
        let response = tokio::time::timeout(timeout, self.http_client.send(request))
            .await
            .map_err(|_| {
                warn!("Health check timeout");
                ApiError::Timeout(timeout)
            })?;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("API is healthy");
                Ok(true)
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "API returned non-success status");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                Err(e)
            }
        }
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<R, ApiError> {
        let token =
            self.session.access_token().await.map_err(|e| ApiError::Auth(e.to_string()))?;

        match self.send_once(method.clone(), path, body.as_ref(), &token).await {
            Err(ApiError::Auth(message)) => {
                // One forced refresh then a single retry; refresh failure
                // clears the session and surfaces as Auth
                debug!(path = %path, "Got 401, forcing token refresh");
                let token = self
                    .session
                    .force_refresh()
                    .await
                    .map_err(|refresh_err| ApiError::Auth(format!("{message}; {refresh_err}")))?;
                self.send_once(method, path, body.as_ref(), &token).await
            }
            other => other,
        }
    }

    async fn send_once<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: &str,
    ) -> Result<R, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%method, url = %url, "API request");

        let mut request = self
            .http_client
            .request(method, &url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match tokio::time::timeout(
            self.config.timeout,
            self.http_client.send(request),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(err)) => return Err(err),
            Err(_) => return Err(ApiError::Timeout(self.config.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, &url, body_text));
        }

        // 204 and other empty-body successes deserialize as JSON null so
        // unit-typed responses work without a special caller-side path
        let body_text = response
            .text()
            .await
            .map_err(|e| ApiError::Client(format!("Failed to read response body: {e}")))?;

        if body_text.trim().is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "Empty response body ({}) for a response type that requires content",
                    status.as_u16()
                ))
            });
        }

        serde_json::from_str(&body_text)
            .map_err(|e| ApiError::Client(format!("Failed to parse response: {e}")))
    }

    pub(super) fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth(message)
        } else if status == StatusCode::NOT_FOUND {
            ApiError::NotFound(message)
        } else if status == StatusCode::CONFLICT {
            ApiError::Conflict(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else if status.is_client_error() {
            ApiError::Client(message)
        } else {
            ApiError::Network(message)
        }
    }

}
