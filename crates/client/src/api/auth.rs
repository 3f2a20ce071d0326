//! Authentication endpoints
//!
//! These calls carry no bearer token: login and registration establish the
//! session, and refresh runs while the access token is already invalid. The
//! wrapper therefore talks to the transport directly instead of going
//! through [`super::client::ApiClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use salonkit_domain::{Result, SalonError, TokenSet, User};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::client::ApiClient;
use crate::http::HttpClient;
use crate::session::TokenRefresher;

/// Credentials for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Token pair and user profile returned by the auth endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds; 0 when the backend omits it
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthResponse {
    /// Convert the response into a [`TokenSet`] with an absolute expiry
    #[must_use]
    pub fn into_token_set(self) -> TokenSet {
        TokenSet::new(self.access_token, self.refresh_token, self.expires_in)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Client for the unauthenticated auth endpoints
pub struct AuthApi {
    http_client: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl AuthApi {
    /// Create a new auth API client
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client, base_url: base_url.into(), timeout })
    }

    /// Authenticate with email and password
    ///
    /// # Errors
    /// Returns `SalonError::Auth` on rejected credentials.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response = self.post("/auth/login", request).await?;
        info!("Login succeeded");
        Ok(response)
    }

    /// Create a new account
    ///
    /// # Errors
    /// Returns `SalonError::Conflict` when the email is already registered.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self.post("/auth/register", request).await?;
        info!("Registration succeeded");
        Ok(response)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// # Errors
    /// Returns `SalonError::Auth` when the refresh token is rejected.
    #[instrument(skip_all)]
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse> {
        self.post("/auth/refresh", &RefreshRequest { refresh_token }).await
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http_client.request(Method::POST, &url).json(body);

        let response = tokio::time::timeout(self.timeout, self.http_client.send(request))
            .await
            .map_err(|_| SalonError::Network(format!("{url} timed out after {:?}", self.timeout)))??;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ApiClient::map_status_error(status, &url, body_text).into());
        }

        response
            .json()
            .await
            .map_err(|e| SalonError::Internal(format!("Failed to parse auth response: {e}")))
    }
}

#[async_trait]
impl TokenRefresher for AuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        let response = self.refresh_tokens(refresh_token).await?;
        Ok(response.into_token_set())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn auth_api(server: &MockServer) -> AuthApi {
        AuthApi::new(server.uri(), Duration::from_secs(5)).expect("auth api")
    }

    #[tokio::test]
    async fn login_parses_tokens_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "ava@example.com", "password": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "acc-1",
                "refreshToken": "ref-1",
                "expiresIn": 900,
                "user": {"_id": "u1", "name": "Ava", "email": "ava@example.com", "role": "client"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = auth_api(&server);
        let response = api
            .login(&LoginRequest {
                email: "ava@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.access_token, "acc-1");
        assert_eq!(response.user.as_ref().map(|u| u.name.as_str()), Some("Ava"));

        let tokens = response.into_token_set();
        assert_eq!(tokens.refresh_token.as_deref(), Some("ref-1"));
        assert!(tokens.expires_at.is_some());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_as_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let api = auth_api(&server);
        let result = api
            .login(&LoginRequest {
                email: "ava@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(SalonError::Auth(_))));
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_as_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(409).set_body_string("email already in use"))
            .mount(&server)
            .await;

        let api = auth_api(&server);
        let result = api
            .register(&RegisterRequest {
                name: "Ava".to_string(),
                email: "ava@example.com".to_string(),
                password: "hunter2".to_string(),
                phone: None,
            })
            .await;

        assert!(matches!(result, Err(SalonError::Conflict(_))));
    }

    #[tokio::test]
    async fn refresher_trait_yields_a_token_set() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refreshToken": "ref-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "acc-2",
                "refreshToken": "ref-2",
                "expiresIn": 900
            })))
            .mount(&server)
            .await;

        let api = auth_api(&server);
        let tokens = TokenRefresher::refresh(&api, "ref-1").await.unwrap();
        assert_eq!(tokens.access_token, "acc-2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("ref-2"));
    }
}
