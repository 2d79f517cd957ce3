use serde::{Deserialize, Serialize};

use crate::types::ProfileId;

/// Which of the two credentials on a record is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Session => "session",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Stored form of an issued token: its SHA-256 digest and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDigest {
    pub hash: String,
    /// Unix seconds.
    pub expires_at: i64,
}

impl TokenDigest {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        now_unix > self.expires_at
    }
}

/// Per-profile credential record. At most one session and one refresh
/// digest exist per profile; issuing a new pair replaces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileAuthRecord {
    pub profile_id: ProfileId,
    pub session: Option<TokenDigest>,
    pub refresh: Option<TokenDigest>,
}

impl ProfileAuthRecord {
    pub fn digest(&self, kind: TokenKind) -> Option<&TokenDigest> {
        match kind {
            TokenKind::Session => self.session.as_ref(),
            TokenKind::Refresh => self.refresh.as_ref(),
        }
    }
}
