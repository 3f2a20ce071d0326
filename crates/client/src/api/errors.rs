//! API-specific error types
//!
//! Provides error classification for API operations. The retry metadata here
//! is what the transport consults: [`HttpClient`](crate::http::HttpClient)
//! retries a failure only when [`ApiError::should_retry`] says so.

use std::time::Duration;

use salonkit_domain::SalonError;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - retry after token refresh
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth/conflict) - non-retryable
    Client,
    /// Booking conflicts (409) - non-retryable, re-selection required
    Conflict,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::NotFound(_) => ApiErrorCategory::Client,
            Self::Conflict(_) => ApiErrorCategory::Conflict,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication
                | ApiErrorCategory::RateLimit
                | ApiErrorCategory::Server
                | ApiErrorCategory::Network
        )
    }
}

/// Classify transport-level failures
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_builder() {
            Self::Config(format!("invalid request: {err}"))
        } else if err.is_decode() {
            Self::Client(format!("failed to decode response: {err}"))
        } else {
            Self::Network(format!("request failed: {err}"))
        }
    }
}

/// Convert API errors to domain errors at the port boundary
impl From<ApiError> for SalonError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(msg) => SalonError::Auth(msg),
            ApiError::NotFound(msg) => SalonError::NotFound(msg),
            ApiError::Conflict(msg) => SalonError::Conflict(msg),
            ApiError::Client(msg) => SalonError::InvalidInput(msg),
            ApiError::Config(msg) => SalonError::Config(msg),
            ApiError::RateLimit(msg) | ApiError::Server(msg) | ApiError::Network(msg) => {
                SalonError::Network(msg)
            }
            ApiError::Timeout(duration) => {
                SalonError::Network(format!("request timed out after {duration:?}"))
            }
        }
    }
}
