//! Session manager with single-flight token refresh
//!
//! Manages the bearer token lifecycle:
//! - Token retrieval from the configured store
//! - Proactive refresh before expiry (configurable threshold)
//! - Reactive refresh after a 401
//! - Forced logout when the refresh itself fails
//!
//! Invariant: only one refresh is in flight at a time. Callers that hit the
//! refresh path while another refresh is running wait on the guard, then
//! re-check the cached token so the work is done exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use salonkit_domain::constants::TOKEN_REFRESH_THRESHOLD_SECS;
use salonkit_domain::{Result, SalonError, TokenSet};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::store::TokenStore;

/// Trait for exchanging a refresh token for a new token pair
///
/// Implemented by the auth endpoint wrapper; mocked in tests.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchange a refresh token for a fresh token set
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet>;
}

/// Thread-safe session state shared by all API callers
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    current: RwLock<Option<TokenSet>>,
    refresh_guard: Mutex<()>,
    refresh_threshold_secs: i64,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            current: RwLock::new(None),
            refresh_guard: Mutex::new(()),
            refresh_threshold_secs: TOKEN_REFRESH_THRESHOLD_SECS,
        }
    }

    /// Override the proactive refresh threshold (seconds before expiry)
    #[must_use]
    pub fn with_refresh_threshold(mut self, seconds: i64) -> Self {
        self.refresh_threshold_secs = seconds;
        self
    }

    /// Load tokens from the store into memory
    ///
    /// Should be called on startup. Returns `true` if a session was restored.
    ///
    /// # Errors
    /// Returns error if the store itself fails (not if it is empty).
    pub async fn initialize(&self) -> Result<bool> {
        match self.store.load().await? {
            Some(tokens) => {
                *self.current.write().await = Some(tokens);
                info!("Session restored from token store");
                Ok(true)
            }
            None => {
                debug!("No stored session found");
                Ok(false)
            }
        }
    }

    /// Store a new token pair (after login/registration)
    ///
    /// # Errors
    /// Returns error if persisting to the store fails.
    pub async fn store_tokens(&self, tokens: TokenSet) -> Result<()> {
        self.store.save(&tokens).await?;
        *self.current.write().await = Some(tokens);
        info!("Session tokens stored");
        Ok(())
    }

    /// Whether a session is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Get a valid access token, refreshing proactively when near expiry
    ///
    /// # Errors
    /// Returns `SalonError::Auth` when no session exists or refresh fails.
    pub async fn access_token(&self) -> Result<String> {
        let needs_refresh = {
            let tokens = self.current.read().await;
            match tokens.as_ref() {
                Some(t) => t.is_expired(self.refresh_threshold_secs),
                None => return Err(SalonError::Auth("not authenticated".to_string())),
            }
        };

        if needs_refresh {
            self.refresh_once().await?;
        }

        let tokens = self.current.read().await;
        tokens
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| SalonError::Auth("not authenticated".to_string()))
    }

    /// Force a refresh (reactive path after a 401)
    ///
    /// Returns the new access token. Single-flight: concurrent callers share
    /// one refresh.
    ///
    /// # Errors
    /// Returns `SalonError::Auth` if no session exists or refresh fails; a
    /// failed refresh clears the session (forced logout).
    pub async fn force_refresh(&self) -> Result<String> {
        let stale = {
            let tokens = self.current.read().await;
            tokens
                .as_ref()
                .map(|t| t.access_token.clone())
                .ok_or_else(|| SalonError::Auth("not authenticated".to_string()))?
        };

        let _guard = self.refresh_guard.lock().await;

        // Another caller may have refreshed while we waited on the guard
        {
            let tokens = self.current.read().await;
            if let Some(t) = tokens.as_ref() {
                if t.access_token != stale {
                    debug!("Token already refreshed by a concurrent caller");
                    return Ok(t.access_token.clone());
                }
            }
        }

        self.run_refresh().await
    }

    /// Clear the session (logout)
    ///
    /// # Errors
    /// Returns error if the store deletion fails.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        *self.current.write().await = None;
        info!("Session cleared (logged out)");
        Ok(())
    }

    async fn refresh_once(&self) -> Result<()> {
        let _guard = self.refresh_guard.lock().await;

        // Re-check after acquiring: a concurrent caller may have refreshed
        let still_stale = {
            let tokens = self.current.read().await;
            match tokens.as_ref() {
                Some(t) => t.is_expired(self.refresh_threshold_secs),
                None => return Err(SalonError::Auth("not authenticated".to_string())),
            }
        };

        if still_stale {
            self.run_refresh().await?;
        }
        Ok(())
    }

    /// Perform the actual refresh. Caller must hold `refresh_guard`.
    async fn run_refresh(&self) -> Result<String> {
        let refresh_token = {
            let tokens = self.current.read().await;
            match tokens.as_ref() {
                Some(t) => t
                    .refresh_token
                    .clone()
                    .ok_or_else(|| SalonError::Auth("no refresh token available".to_string()))?,
                None => return Err(SalonError::Auth("not authenticated".to_string())),
            }
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(new_tokens) => {
                let access = new_tokens.access_token.clone();
                self.store.save(&new_tokens).await?;
                *self.current.write().await = Some(new_tokens);
                info!("Access token refreshed");
                Ok(access)
            }
            Err(err) => {
                // Refresh failed: the session is unrecoverable, force logout
                warn!(error = %err, "Token refresh failed, clearing session");
                if let Err(clear_err) = self.logout().await {
                    warn!(error = %clear_err, "Failed to clear session after refresh failure");
                }
                Err(SalonError::Auth(format!("token refresh failed: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::super::store::InMemoryTokenStore;
    use super::*;

    struct CountingRefresher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRefresher {
        fn new(fail: bool) -> Self {
            Self { calls: AtomicUsize::new(0), fail }
        }
    }

    #[async_trait]
    impl TokenRefresher for CountingRefresher {
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            // Hold the guard long enough for waiters to pile up
            tokio::time::sleep(Duration::from_millis(30)).await;
            if self.fail {
                Err(SalonError::Auth("refresh token rejected".to_string()))
            } else {
                Ok(TokenSet::new(format!("access-{n}"), Some("refresh".to_string()), 3600))
            }
        }
    }

    fn manager(refresher: Arc<CountingRefresher>) -> Arc<SessionManager> {
        Arc::new(SessionManager::new(Arc::new(InMemoryTokenStore::new()), refresher))
    }

    #[tokio::test]
    async fn access_token_requires_a_session() {
        let session = manager(Arc::new(CountingRefresher::new(false)));
        let result = session.access_token().await;
        assert!(matches!(result, Err(SalonError::Auth(_))));
    }

    #[tokio::test]
    async fn fresh_token_is_returned_without_refresh() {
        let refresher = Arc::new(CountingRefresher::new(false));
        let session = manager(refresher.clone());
        session
            .store_tokens(TokenSet::new("access".to_string(), Some("refresh".to_string()), 3600))
            .await
            .unwrap();

        assert_eq!(session.access_token().await.unwrap(), "access");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn near_expiry_token_triggers_refresh() {
        let refresher = Arc::new(CountingRefresher::new(false));
        let session = manager(refresher.clone());
        // Expires within the 300s threshold
        session
            .store_tokens(TokenSet::new("old".to_string(), Some("refresh".to_string()), 60))
            .await
            .unwrap();

        assert_eq!(session.access_token().await.unwrap(), "access-0");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let refresher = Arc::new(CountingRefresher::new(false));
        let session = manager(refresher.clone());
        session
            .store_tokens(TokenSet::new("old".to_string(), Some("refresh".to_string()), 60))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let session = session.clone();
            handles.push(tokio::spawn(async move { session.access_token().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "access-0");
        }

        // Only one refresh in flight; others waited and reused the result
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_force_refreshes_share_one_refresh() {
        let refresher = Arc::new(CountingRefresher::new(false));
        let session = manager(refresher.clone());
        session
            .store_tokens(TokenSet::new("old".to_string(), Some("refresh".to_string()), 3600))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let session = session.clone();
            handles.push(tokio::spawn(async move { session.force_refresh().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "access-0");
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_refresh_forces_logout() {
        let refresher = Arc::new(CountingRefresher::new(true));
        let session = manager(refresher);
        session
            .store_tokens(TokenSet::new("old".to_string(), Some("refresh".to_string()), 60))
            .await
            .unwrap();

        let result = session.access_token().await;
        assert!(matches!(result, Err(SalonError::Auth(_))));
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn missing_refresh_token_is_an_auth_error() {
        let refresher = Arc::new(CountingRefresher::new(false));
        let session = manager(refresher.clone());
        session.store_tokens(TokenSet::new("old".to_string(), None, 60)).await.unwrap();

        let result = session.access_token().await;
        assert!(matches!(result, Err(SalonError::Auth(_))));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }
}
