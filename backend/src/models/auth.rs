use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{MAX_ACCESS_TOKEN_LENGTH, MAX_UUID_LENGTH};
use crate::validation::rules::validate_profile_uuid;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Access token from the external identity provider, exchanged for a session.
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_ACCESS_TOKEN_LENGTH))]
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[serde(rename = "sessionToken")]
    pub session_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    /// Hyphenated profile UUID the tokens were issued for.
    pub profile_uuid: String,
    /// Unix seconds.
    #[serde(rename = "refreshTokenExpiresAt")]
    pub refresh_token_expires_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Body shared by `/check-session` and `/refresh`.
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_profile_uuid")
    )]
    pub profile_uuid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckSessionResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    #[serde(rename = "sessionToken")]
    pub session_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Tokens as handed out by a login or refresh. Plaintext only lives here.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub session_token: String,
    pub refresh_token: String,
    pub session_expires_at: i64,
    pub refresh_expires_at: i64,
}
