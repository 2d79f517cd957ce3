use std::sync::Arc;

use crate::error::AppError;
use crate::services::auth::AuthService;
use crate::services::identity::IdentityProviderError;
use crate::types::ProfileId;

/// Proof of identity presented with a mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Session-Token` header.
    Session(String),
    /// `Authorization: Bearer <access token>`, honored only in legacy mode.
    Bearer(String),
}

/// Decides whether a caller may act on a resource owned by a profile.
pub struct AuthorizationGate {
    auth: Arc<AuthService>,
    legacy_bearer_enabled: bool,
}

impl AuthorizationGate {
    pub fn new(auth: Arc<AuthService>, legacy_bearer_enabled: bool) -> Self {
        Self {
            auth,
            legacy_bearer_enabled,
        }
    }

    pub fn legacy_bearer_enabled(&self) -> bool {
        self.legacy_bearer_enabled
    }

    pub async fn is_owner(
        &self,
        credential: &Credential,
        owner: &ProfileId,
    ) -> Result<bool, AppError> {
        match credential {
            Credential::Session(token) => self.auth.check_session(token, owner).await,
            Credential::Bearer(_) if !self.legacy_bearer_enabled => Ok(false),
            Credential::Bearer(access_token) => {
                match self.auth.resolve_access_token(access_token).await {
                    Ok(profile_id) => Ok(profile_id == *owner),
                    Err(IdentityProviderError::Rejected(_)) => Ok(false),
                    Err(IdentityProviderError::Unavailable(reason)) => {
                        Err(AppError::IdentityProviderUnavailable(reason))
                    }
                }
            }
        }
    }

    pub async fn authorize(&self, credential: &Credential, owner: &ProfileId) -> Result<(), AppError> {
        if self.is_owner(credential, owner).await? {
            Ok(())
        } else {
            tracing::info!(owner = %owner, "Caller is not the resource owner");
            Err(AppError::unauthorized())
        }
    }

    /// Read-side check: any failure just means the public view.
    pub async fn can_view_private(&self, credential: Option<&Credential>, owner: &ProfileId) -> bool {
        let Some(credential) = credential else {
            return false;
        };
        match self.is_owner(credential, owner).await {
            Ok(allowed) => allowed,
            Err(err) => {
                tracing::warn!(owner = %owner, error = %err, "Falling back to public view");
                false
            }
        }
    }
}
