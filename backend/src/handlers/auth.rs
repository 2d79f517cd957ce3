use axum::{extract::State, Json};

use crate::{
    error::AppError,
    handlers::parse_profile_field,
    models::auth::{
        CheckSessionResponse, LoginRequest, LoginResponse, ProfileRequest, RefreshResponse,
    },
    state::AppState,
    validation::{RefreshTokenHeader, SessionTokenHeader, ValidatedJson},
};

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (profile_id, tokens) = state.auth.login(&payload.access_token).await?;

    Ok(Json(LoginResponse {
        session_token: tokens.session_token,
        refresh_token: tokens.refresh_token,
        profile_uuid: profile_id.standard(),
        refresh_token_expires_at: tokens.refresh_expires_at,
    }))
}

pub async fn check_session(
    State(state): State<AppState>,
    SessionTokenHeader(session_token): SessionTokenHeader,
    ValidatedJson(payload): ValidatedJson<ProfileRequest>,
) -> Result<Json<CheckSessionResponse>, AppError> {
    let profile_id = parse_profile_field("body.profile_uuid", &payload.profile_uuid)?;
    let success = state.auth.check_session(&session_token, &profile_id).await?;
    Ok(Json(CheckSessionResponse { success }))
}

pub async fn refresh(
    State(state): State<AppState>,
    RefreshTokenHeader(refresh_token): RefreshTokenHeader,
    ValidatedJson(payload): ValidatedJson<ProfileRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let profile_id = parse_profile_field("body.profile_uuid", &payload.profile_uuid)?;
    let tokens = state.auth.refresh(&refresh_token, &profile_id).await?;

    Ok(Json(RefreshResponse {
        session_token: tokens.session_token,
        refresh_token: tokens.refresh_token,
    }))
}
