//! Access-token sources for the Google Calendar API.
//!
//! A static token serves short-lived deployments and tests; the refresh-token
//! source exchanges a stored OAuth refresh token at the token endpoint and
//! caches the result until shortly before expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use sitecal_domain::{CalendarConfig, Result, SiteCalError};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Supplies bearer tokens for the service credential.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Whether credentials are configured at all.
    fn has_credentials(&self) -> bool;

    async fn access_token(&self) -> Result<String>;
}

/// Fixed bearer token.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn new(token: Option<String>) -> Self {
        Self { token: token.filter(|token| !token.trim().is_empty()) }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    fn has_credentials(&self) -> bool {
        self.token.is_some()
    }

    async fn access_token(&self) -> Result<String> {
        self.token
            .clone()
            .ok_or_else(|| SiteCalError::Auth("no Google access token configured".into()))
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// OAuth refresh-token grant with an in-memory cache.
pub struct RefreshTokenSource {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: Mutex<Option<CachedToken>>,
}

impl RefreshTokenSource {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            cached: Mutex::new(None),
        }
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Token refresh rejected");
            return Err(SiteCalError::Auth(format!("token refresh failed ({status}): {body}")));
        }

        let token: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| SiteCalError::Auth(format!("failed to parse token response: {e}")))?;

        let lifetime = chrono::Duration::seconds(token.expires_in.max(0) - EXPIRY_MARGIN_SECS);
        Ok(CachedToken { value: token.access_token, expires_at: Utc::now() + lifetime })
    }
}

#[async_trait]
impl AccessTokenSource for RefreshTokenSource {
    fn has_credentials(&self) -> bool {
        true
    }

    #[instrument(skip(self))]
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.expires_at > Utc::now()) {
            return Ok(token.value.clone());
        }

        let fresh = self.refresh().await?;
        debug!(expires_at = %fresh.expires_at, "Refreshed Google access token");
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Pick the token source the calendar configuration describes.
///
/// A complete refresh-token triple wins over a static access token.
pub fn token_source_from_config(
    client: Client,
    config: &CalendarConfig,
) -> Box<dyn AccessTokenSource> {
    match (&config.client_id, &config.client_secret, &config.refresh_token) {
        (Some(id), Some(secret), Some(refresh)) => Box::new(RefreshTokenSource::new(
            client,
            config.token_url.clone(),
            id.clone(),
            secret.clone(),
            refresh.clone(),
        )),
        _ => Box::new(StaticTokenSource::new(config.access_token.clone())),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn static_source_without_token_is_auth_error() {
        let source = StaticTokenSource::new(Some("  ".into()));
        assert!(!source.has_credentials());
        assert!(matches!(source.access_token().await, Err(SiteCalError::Auth(_))));
    }

    #[tokio::test]
    async fn refresh_source_caches_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "ya29.a", "expires_in": 3600})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = RefreshTokenSource::new(
            Client::new(),
            format!("{}/token", server.uri()),
            "client",
            "secret",
            "refresh",
        );

        assert_eq!(source.access_token().await.unwrap(), "ya29.a");
        assert_eq!(source.access_token().await.unwrap(), "ya29.a");
    }

    #[tokio::test]
    async fn rejected_refresh_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let source =
            RefreshTokenSource::new(Client::new(), server.uri(), "client", "secret", "revoked");

        let err = source.access_token().await.unwrap_err();
        assert!(matches!(err, SiteCalError::Auth(ref msg) if msg.contains("invalid_grant")));
    }
}
