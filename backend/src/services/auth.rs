//! Session and refresh token issuance, validation and rotation.

use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::auth::IssuedTokens;
use crate::models::profile_auth::{ProfileAuthRecord, TokenDigest, TokenKind};
use crate::repositories::ProfileAuthStore;
use crate::services::identity::{IdentityProvider, IdentityProviderError};
use crate::types::ProfileId;
use crate::utils::time::Clock;
use crate::utils::token::{digests_match, generate_token, hash_token};

#[derive(Debug, Clone, Copy)]
pub struct TokenSettings {
    pub session_bytes: usize,
    pub refresh_bytes: usize,
    pub session_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl From<&Config> for TokenSettings {
    fn from(config: &Config) -> Self {
        Self {
            session_bytes: config.session_token_bytes,
            refresh_bytes: config.refresh_token_bytes,
            session_ttl: config.session_ttl(),
            refresh_ttl: config.refresh_ttl(),
        }
    }
}

/// True iff `record` holds an unexpired digest of `kind` matching `token`.
pub fn verify_credential(
    record: Option<&ProfileAuthRecord>,
    kind: TokenKind,
    token: &str,
    now_unix: i64,
) -> bool {
    let Some(digest) = record.and_then(|record| record.digest(kind)) else {
        return false;
    };
    if digest.is_expired(now_unix) {
        return false;
    }
    digests_match(&hash_token(token), &digest.hash)
}

pub struct AuthService {
    store: Arc<dyn ProfileAuthStore>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    settings: TokenSettings,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn ProfileAuthStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            store,
            identity,
            clock,
            settings,
        }
    }

    /// Exchanges an identity-provider access token for a fresh token pair,
    /// replacing whatever the profile held before.
    pub async fn login(&self, access_token: &str) -> Result<(ProfileId, IssuedTokens), AppError> {
        let profile_id = self
            .resolve_access_token(access_token)
            .await
            .map_err(|err| match err {
                IdentityProviderError::Rejected(reason) => {
                    tracing::info!(reason = %reason, "Login rejected by identity provider");
                    AppError::format("body.access_token", "access token was not accepted")
                }
                IdentityProviderError::Unavailable(reason) => {
                    AppError::IdentityProviderUnavailable(reason)
                }
            })?;

        let tokens = self.issue_tokens(profile_id).await?;
        tracing::info!(profile_id = %profile_id, "Issued session after login");
        Ok((profile_id, tokens))
    }

    pub async fn check_session(
        &self,
        session_token: &str,
        profile_id: &ProfileId,
    ) -> Result<bool, AppError> {
        self.verify(TokenKind::Session, session_token, profile_id)
            .await
    }

    /// Rotates both tokens. The presented refresh token is dead afterwards.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        profile_id: &ProfileId,
    ) -> Result<IssuedTokens, AppError> {
        if !self
            .verify(TokenKind::Refresh, refresh_token, profile_id)
            .await?
        {
            tracing::info!(profile_id = %profile_id, "Refresh token rejected");
            return Err(AppError::unauthorized());
        }

        let tokens = self.issue_tokens(*profile_id).await?;
        tracing::info!(profile_id = %profile_id, "Rotated tokens after refresh");
        Ok(tokens)
    }

    pub async fn resolve_access_token(
        &self,
        access_token: &str,
    ) -> Result<ProfileId, IdentityProviderError> {
        self.identity.resolve_profile(access_token).await
    }

    async fn verify(
        &self,
        kind: TokenKind,
        token: &str,
        profile_id: &ProfileId,
    ) -> Result<bool, AppError> {
        let record = self.store.find_by_profile_id(profile_id).await?;
        let valid = verify_credential(record.as_ref(), kind, token, self.clock.now_unix());
        tracing::debug!(
            profile_id = %profile_id,
            kind = kind.as_str(),
            record_found = record.is_some(),
            valid,
            "Verified credential"
        );
        Ok(valid)
    }

    async fn issue_tokens(&self, profile_id: ProfileId) -> Result<IssuedTokens, AppError> {
        let now = self.clock.now();
        let expires_at = |ttl: Duration| {
            now.checked_add_signed(ttl)
                .map(|at| at.timestamp())
                .ok_or_else(|| {
                    AppError::InternalServerError(anyhow::anyhow!(
                        "token expiry out of range: now={} ttl={}",
                        now,
                        ttl
                    ))
                })
        };
        let tokens = IssuedTokens {
            session_token: generate_token(self.settings.session_bytes),
            refresh_token: generate_token(self.settings.refresh_bytes),
            session_expires_at: expires_at(self.settings.session_ttl)?,
            refresh_expires_at: expires_at(self.settings.refresh_ttl)?,
        };

        let record = ProfileAuthRecord {
            profile_id,
            session: Some(TokenDigest {
                hash: hash_token(&tokens.session_token),
                expires_at: tokens.session_expires_at,
            }),
            refresh: Some(TokenDigest {
                hash: hash_token(&tokens.refresh_token),
                expires_at: tokens.refresh_expires_at,
            }),
        };
        self.store.upsert(&record).await?;
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::profile_auth::MockProfileAuthStore;
    use crate::services::identity::MockIdentityProvider;
    use crate::utils::time::ManualClock;
    use chrono::{TimeZone, Utc};

    fn profile() -> ProfileId {
        ProfileId::parse("11111111111111111111111111111111").unwrap()
    }

    fn settings() -> TokenSettings {
        TokenSettings::from(&Config::default())
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn record_with(kind: TokenKind, token: &str, expires_at: i64) -> ProfileAuthRecord {
        let digest = Some(TokenDigest {
            hash: hash_token(token),
            expires_at,
        });
        let (session, refresh) = match kind {
            TokenKind::Session => (digest, None),
            TokenKind::Refresh => (None, digest),
        };
        ProfileAuthRecord {
            profile_id: profile(),
            session,
            refresh,
        }
    }

    #[test]
    fn verify_credential_rules() {
        let record = record_with(TokenKind::Session, "tok", 100);
        assert!(verify_credential(Some(&record), TokenKind::Session, "tok", 100));
        assert!(!verify_credential(Some(&record), TokenKind::Session, "tok", 101));
        assert!(!verify_credential(Some(&record), TokenKind::Session, "other", 50));
        assert!(!verify_credential(Some(&record), TokenKind::Refresh, "tok", 50));
        assert!(!verify_credential(None, TokenKind::Session, "tok", 50));
    }

    #[tokio::test]
    async fn login_stores_hashes_of_returned_tokens() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_resolve_profile()
            .returning(|_| Ok(profile()));

        let stored = Arc::new(std::sync::Mutex::new(None::<ProfileAuthRecord>));
        let sink = stored.clone();
        let mut store = MockProfileAuthStore::new();
        store.expect_upsert().times(1).returning(move |record| {
            *sink.lock().unwrap() = Some(record.clone());
            Ok(())
        });

        let clock = clock();
        let service = AuthService::new(Arc::new(store), Arc::new(identity), clock.clone(), settings());
        let (profile_id, tokens) = service.login("access").await.unwrap();

        assert_eq!(profile_id, profile());
        assert_eq!(tokens.session_token.len(), 64);
        assert_eq!(tokens.refresh_token.len(), 128);

        let record = stored.lock().unwrap().clone().unwrap();
        let session = record.session.unwrap();
        let refresh = record.refresh.unwrap();
        assert_eq!(session.hash, hash_token(&tokens.session_token));
        assert_eq!(refresh.hash, hash_token(&tokens.refresh_token));
        assert_eq!(session.expires_at, clock.now_unix() + 3600);
        assert_eq!(refresh.expires_at, tokens.refresh_expires_at);
        assert!(session.expires_at < refresh.expires_at);
    }

    #[tokio::test]
    async fn login_fails_cleanly_when_expiry_overflows() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_resolve_profile()
            .returning(|_| Ok(profile()));
        let mut store = MockProfileAuthStore::new();
        store.expect_upsert().never();

        let clock = clock();
        clock.set(chrono::DateTime::<Utc>::MAX_UTC);
        let service = AuthService::new(Arc::new(store), Arc::new(identity), clock, settings());

        assert!(matches!(
            service.login("access").await,
            Err(AppError::InternalServerError(_))
        ));
    }

    #[tokio::test]
    async fn login_maps_provider_errors() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_resolve_profile()
            .returning(|token| match token {
                "down" => Err(IdentityProviderError::Unavailable("timeout".to_string())),
                _ => Err(IdentityProviderError::Rejected("bad token".to_string())),
            });
        let mut store = MockProfileAuthStore::new();
        store.expect_upsert().never();

        let service = AuthService::new(Arc::new(store), Arc::new(identity), clock(), settings());

        match service.login("bad").await {
            Err(AppError::Format { field, .. }) => assert_eq!(field, "body.access_token"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            service.login("down").await,
            Err(AppError::IdentityProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn refresh_with_wrong_token_does_not_touch_store() {
        let mut store = MockProfileAuthStore::new();
        store
            .expect_find_by_profile_id()
            .returning(|_| Ok(Some(record_with(TokenKind::Refresh, "right", i64::MAX))));
        store.expect_upsert().never();

        let service = AuthService::new(
            Arc::new(store),
            Arc::new(MockIdentityProvider::new()),
            clock(),
            settings(),
        );

        assert!(matches!(
            service.refresh("wrong", &profile()).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn expired_refresh_token_is_rejected() {
        let clock = clock();
        let expires_at = clock.now_unix() - 1;
        let mut store = MockProfileAuthStore::new();
        store
            .expect_find_by_profile_id()
            .returning(move |_| Ok(Some(record_with(TokenKind::Refresh, "tok", expires_at))));
        store.expect_upsert().never();

        let service = AuthService::new(
            Arc::new(store),
            Arc::new(MockIdentityProvider::new()),
            clock,
            settings(),
        );

        assert!(matches!(
            service.refresh("tok", &profile()).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn check_session_store_failure_is_an_error_not_false() {
        let mut store = MockProfileAuthStore::new();
        store
            .expect_find_by_profile_id()
            .returning(|_| Err(AppError::InternalServerError(anyhow::anyhow!("db down"))));

        let service = AuthService::new(
            Arc::new(store),
            Arc::new(MockIdentityProvider::new()),
            clock(),
            settings(),
        );

        assert!(service.check_session("tok", &profile()).await.is_err());
    }
}
