use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::{parse_world_field, stored_owner},
    models::world::{
        DescriptionEditRequest, EditMessageResponse, UnlistRequest, UnlistResponse, World,
        WorldPatchRequest, WorldPatchResponse,
    },
    services::Credential,
    state::AppState,
    types::WorldId,
    validation::ValidatedJson,
};

const LEGACY_EDIT_MESSAGE: &str = "Success.";

async fn find_world_or_404(state: &AppState, world_uuid: &WorldId) -> Result<World, AppError> {
    state
        .worlds
        .find_world(world_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("World {}", world_uuid)))
}

pub async fn get_world(
    State(state): State<AppState>,
    Path(world_uuid): Path<String>,
) -> Result<Json<World>, AppError> {
    let world_uuid = parse_world_field("params.world_uuid", &world_uuid)?;
    Ok(Json(find_world_or_404(&state, &world_uuid).await?))
}

pub async fn patch_world(
    State(state): State<AppState>,
    Path(world_uuid): Path<String>,
    credential: Credential,
    ValidatedJson(payload): ValidatedJson<WorldPatchRequest>,
) -> Result<Json<WorldPatchResponse>, AppError> {
    let world_uuid = parse_world_field("params.world_uuid", &world_uuid)?;
    let world = find_world_or_404(&state, &world_uuid).await?;
    let owner = stored_owner(&world.owner_uuid)?;
    state.gate.authorize(&credential, &owner).await?;

    let edits = payload.edits;
    if let Some(description) = &edits.description {
        state
            .worlds
            .update_description(&world_uuid, description)
            .await?;
    }
    if let Some(unlisted) = edits.unlisted {
        state.worlds.set_unlisted(&world_uuid, unlisted).await?;
    }
    tracing::info!(world_uuid = %world_uuid, "World edited");

    Ok(Json(WorldPatchResponse { world_uuid, edits }))
}

pub async fn edit_description(
    State(state): State<AppState>,
    credential: Credential,
    ValidatedJson(payload): ValidatedJson<DescriptionEditRequest>,
) -> Result<Json<EditMessageResponse>, AppError> {
    let world_uuid = parse_world_field("body.world_uuid", &payload.world_uuid)?;
    let world = find_world_or_404(&state, &world_uuid).await?;
    let owner = stored_owner(&world.owner_uuid)?;
    state.gate.authorize(&credential, &owner).await?;

    state
        .worlds
        .update_description(&world_uuid, &payload.content)
        .await?;
    tracing::info!(world_uuid = %world_uuid, "World description edited");

    Ok(Json(EditMessageResponse {
        message: LEGACY_EDIT_MESSAGE.to_string(),
    }))
}

/// Flips the unlisted flag.
pub async fn toggle_unlist(
    State(state): State<AppState>,
    credential: Credential,
    ValidatedJson(payload): ValidatedJson<UnlistRequest>,
) -> Result<Json<UnlistResponse>, AppError> {
    let world_uuid = parse_world_field("body.world_uuid", &payload.world_uuid)?;
    let world = find_world_or_404(&state, &world_uuid).await?;
    let owner = stored_owner(&world.owner_uuid)?;
    state.gate.authorize(&credential, &owner).await?;

    let unlisted = !world.legitidevs.unlisted;
    state.worlds.set_unlisted(&world_uuid, unlisted).await?;
    tracing::info!(world_uuid = %world_uuid, unlisted, "World visibility toggled");

    Ok(Json(UnlistResponse {
        message: LEGACY_EDIT_MESSAGE.to_string(),
        unlisted,
    }))
}
