use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError, models::world::World, services::Credential, state::AppState,
    types::ProfileId,
};

/// Listed worlds of `owner`. An owner that is not a profile UUID owns nothing.
pub async fn list_public(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<World>>, AppError> {
    let Ok(owner) = ProfileId::parse(&owner) else {
        return Ok(Json(Vec::new()));
    };
    let worlds = state.worlds.list_by_owner(&owner, false).await?;
    Ok(Json(worlds))
}

/// Like `list_public`, but includes unlisted worlds when the caller proves to
/// be the owner. Anything short of that falls back to the public view.
pub async fn list_for_caller(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    credential: Option<Credential>,
) -> Result<Json<Vec<World>>, AppError> {
    let Ok(owner) = ProfileId::parse(&owner) else {
        return Ok(Json(Vec::new()));
    };
    let include_unlisted = state
        .gate
        .can_view_private(credential.as_ref(), &owner)
        .await;
    let worlds = state
        .worlds
        .list_by_owner(&owner, include_unlisted)
        .await?;
    Ok(Json(worlds))
}
