//! Per-profile credential storage.

use async_trait::async_trait;
use sqlx::FromRow;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::profile_auth::{ProfileAuthRecord, TokenDigest};
use crate::types::ProfileId;

/// Narrow store for hashed session and refresh credentials.
///
/// `upsert` always replaces the whole record, which is what keeps a single
/// active session per profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileAuthStore: Send + Sync {
    async fn find_by_profile_id(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<ProfileAuthRecord>, AppError>;

    async fn upsert(&self, record: &ProfileAuthRecord) -> Result<(), AppError>;
}

#[derive(Debug, FromRow)]
struct ProfileAuthRow {
    profile_id: String,
    session_hash: Option<String>,
    session_expires_at: Option<i64>,
    refresh_hash: Option<String>,
    refresh_expires_at: Option<i64>,
}

fn digest_from_columns(hash: Option<String>, expires_at: Option<i64>) -> Option<TokenDigest> {
    match (hash, expires_at) {
        (Some(hash), Some(expires_at)) => Some(TokenDigest { hash, expires_at }),
        _ => None,
    }
}

impl TryFrom<ProfileAuthRow> for ProfileAuthRecord {
    type Error = AppError;

    fn try_from(row: ProfileAuthRow) -> Result<Self, Self::Error> {
        let profile_id = ProfileId::parse(&row.profile_id).map_err(|err| {
            AppError::InternalServerError(anyhow::anyhow!(
                "stored profile id '{}' is invalid: {}",
                row.profile_id,
                err
            ))
        })?;
        Ok(ProfileAuthRecord {
            profile_id,
            session: digest_from_columns(row.session_hash, row.session_expires_at),
            refresh: digest_from_columns(row.refresh_hash, row.refresh_expires_at),
        })
    }
}

#[derive(Clone)]
pub struct PgProfileAuthStore {
    pool: DbPool,
}

impl PgProfileAuthStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileAuthStore for PgProfileAuthStore {
    async fn find_by_profile_id(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<ProfileAuthRecord>, AppError> {
        let row = sqlx::query_as::<_, ProfileAuthRow>(
            "SELECT profile_id, session_hash, session_expires_at, refresh_hash, refresh_expires_at \
             FROM profile_auth WHERE profile_id = $1",
        )
        .bind(profile_id.short())
        .fetch_optional(&*self.pool)
        .await?;

        row.map(ProfileAuthRecord::try_from).transpose()
    }

    async fn upsert(&self, record: &ProfileAuthRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO profile_auth \
             (profile_id, session_hash, session_expires_at, refresh_hash, refresh_expires_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             ON CONFLICT (profile_id) DO UPDATE SET \
             session_hash = EXCLUDED.session_hash, \
             session_expires_at = EXCLUDED.session_expires_at, \
             refresh_hash = EXCLUDED.refresh_hash, \
             refresh_expires_at = EXCLUDED.refresh_expires_at, \
             updated_at = NOW()",
        )
        .bind(record.profile_id.short())
        .bind(record.session.as_ref().map(|d| d.hash.clone()))
        .bind(record.session.as_ref().map(|d| d.expires_at))
        .bind(record.refresh.as_ref().map(|d| d.hash.clone()))
        .bind(record.refresh.as_ref().map(|d| d.expires_at))
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_profile_auth_store_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockProfileAuthStore>();
    }

    #[test]
    fn row_without_expiry_has_no_digest() {
        let row = ProfileAuthRow {
            profile_id: "11111111111111111111111111111111".to_string(),
            session_hash: Some("abc".to_string()),
            session_expires_at: None,
            refresh_hash: Some("def".to_string()),
            refresh_expires_at: Some(5),
        };
        let record = ProfileAuthRecord::try_from(row).unwrap();
        assert!(record.session.is_none());
        assert_eq!(record.refresh.map(|d| d.expires_at), Some(5));
    }

    #[test]
    fn row_with_corrupt_profile_id_is_internal_error() {
        let row = ProfileAuthRow {
            profile_id: "nope".to_string(),
            session_hash: None,
            session_expires_at: None,
            refresh_hash: None,
            refresh_expires_at: None,
        };
        assert!(matches!(
            ProfileAuthRecord::try_from(row),
            Err(AppError::InternalServerError(_))
        ));
    }
}
