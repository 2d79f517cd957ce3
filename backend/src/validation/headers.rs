//! Typed extractors for credential headers.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::services::Credential;
use crate::state::AppState;
use crate::validation::rules::validate_token_header;

pub const SESSION_TOKEN_HEADER: &str = "session-token";
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

fn header_field(display_name: &str) -> String {
    format!("Request header '{}'", display_name)
}

fn read_token_header(
    headers: &HeaderMap,
    name: &str,
    display_name: &str,
    max_len: usize,
) -> Result<String, AppError> {
    let value = headers
        .get(name)
        .ok_or_else(|| AppError::format(header_field(display_name), "missing"))?
        .to_str()
        .map_err(|_| AppError::format(header_field(display_name), "not valid text"))?
        .trim();
    validate_token_header(value, max_len)
        .map_err(|err| AppError::format(header_field(display_name), err.code.to_string()))?;
    Ok(value.to_string())
}

pub fn parse_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// `Session-Token` header, bounded by the configured session token length.
#[derive(Debug, Clone)]
pub struct SessionTokenHeader(pub String);

impl FromRequestParts<AppState> for SessionTokenHeader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        read_token_header(
            &parts.headers,
            SESSION_TOKEN_HEADER,
            "Session-Token",
            state.config.max_session_token_length(),
        )
        .map(SessionTokenHeader)
    }
}

/// `Refresh-Token` header, bounded by the configured refresh token length.
#[derive(Debug, Clone)]
pub struct RefreshTokenHeader(pub String);

impl FromRequestParts<AppState> for RefreshTokenHeader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        read_token_header(
            &parts.headers,
            REFRESH_TOKEN_HEADER,
            "Refresh-Token",
            state.config.max_refresh_token_length(),
        )
        .map(RefreshTokenHeader)
    }
}

/// `Session-Token` wins; a bearer access token is only picked up when the
/// session header is absent and legacy mode is on.
impl FromRequestParts<AppState> for Credential {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if parts.headers.contains_key(SESSION_TOKEN_HEADER) || !state.config.legacy_bearer_auth_enabled {
            return SessionTokenHeader::from_request_parts(parts, state)
                .await
                .map(|SessionTokenHeader(token)| Credential::Session(token));
        }
        parse_bearer_token(&parts.headers)
            .map(Credential::Bearer)
            .ok_or_else(|| AppError::format(header_field("Session-Token"), "missing"))
    }
}

/// Absent or malformed credentials read as `None`.
impl OptionalFromRequestParts<AppState> for Credential {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(<Credential as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .ok())
    }
}
