//! Token persistence boundary

use async_trait::async_trait;
use salonkit_domain::{Result, TokenSet};
use tokio::sync::RwLock;

/// Trait for persisting the session token pair
///
/// The browser original kept tokens in local storage; embedders provide
/// whatever storage suits them (keychain, file, memory).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token pair, if any
    async fn load(&self) -> Result<Option<TokenSet>>;

    /// Persist the token pair
    async fn save(&self, tokens: &TokenSet) -> Result<()>;

    /// Remove any stored tokens
    async fn clear(&self) -> Result<()>;
}

/// In-memory token store for tests and short-lived sessions
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<Option<TokenSet>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenSet>> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenSet) -> Result<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear_round_trip() {
        let store = InMemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());

        let tokens = TokenSet::new("access".to_string(), Some("refresh".to_string()), 3600);
        store.save(&tokens).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
