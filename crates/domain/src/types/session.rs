//! Bearer token pair with expiry metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access and refresh tokens with expiry metadata
///
/// The refresh token is optional because a session restored from storage may
/// only carry the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiration timestamp (UTC), calculated at creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Create a new `TokenSet` with a calculated expiration timestamp
    ///
    /// # Arguments
    /// * `access_token` - The access token
    /// * `refresh_token` - Optional refresh token
    /// * `expires_in` - Access token lifetime in seconds (0 = no expiry known)
    #[must_use]
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        let expires_at =
            (expires_in > 0).then(|| Utc::now() + chrono::Duration::seconds(expires_in));
        Self { access_token, refresh_token, expires_at }
    }

    /// Check if the access token is expired or will expire within the
    /// given threshold
    ///
    /// Returns `false` when no expiry is known; a stale token then surfaces
    /// as a 401 and is refreshed reactively.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + chrono::Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }

    /// Seconds until token expiration, if an expiry is known
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}
