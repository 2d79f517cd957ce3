//! Exchange of an identity-provider access token for a profile id.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::types::ProfileId;

#[derive(Debug, thiserror::Error)]
pub enum IdentityProviderError {
    /// The provider answered and refused the token.
    #[error("access token rejected: {0}")]
    Rejected(String),
    /// The provider could not give an answer.
    #[error("{0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_profile(&self, access_token: &str)
        -> Result<ProfileId, IdentityProviderError>;
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: Option<String>,
    error: Option<serde_json::Value>,
}

/// Calls `GET <url>` with `Authorization: Bearer <access token>` and expects
/// `{ "id": "<short uuid>", ... }` or `{ "error": ... }`.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpIdentityProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve_profile(
        &self,
        access_token: &str,
    ) -> Result<ProfileId, IdentityProviderError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    IdentityProviderError::Unavailable("request timed out".to_string())
                } else {
                    IdentityProviderError::Unavailable(format!("request failed: {}", err))
                }
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(IdentityProviderError::Unavailable(format!(
                "provider responded with {}",
                status
            )));
        }

        let body = response.json::<ProfileResponse>().await;
        if status.is_client_error() {
            let reason = body
                .ok()
                .and_then(|body| body.error)
                .map(|error| error.to_string())
                .unwrap_or_else(|| status.to_string());
            return Err(IdentityProviderError::Rejected(reason));
        }

        let body = body.map_err(|err| {
            IdentityProviderError::Unavailable(format!("unreadable provider response: {}", err))
        })?;
        if let Some(error) = body.error {
            return Err(IdentityProviderError::Rejected(error.to_string()));
        }
        let id = body
            .id
            .ok_or_else(|| IdentityProviderError::Rejected("no profile id in response".into()))?;
        ProfileId::parse(&id).map_err(|err| IdentityProviderError::Rejected(err.to_string()))
    }
}
