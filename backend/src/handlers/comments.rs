use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::{parse_comment_field, parse_profile_field, parse_world_field, stored_owner},
    models::world::{
        Comment, CommentDeleteRequest, CommentEditResponse, CommentListQuery,
        CommentRemovedResponse, CommentRequest, CommentSource, CommentWithWorld, RemovedComment,
    },
    services::Credential,
    state::AppState,
    types::CommentId,
    utils::time::Clock,
    validation::{ValidatedJson, ValidatedQuery},
};

fn comment_not_found(uuid: &CommentId) -> AppError {
    AppError::NotFound(format!("Comment {}", uuid))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<CommentWithWorld>, AppError> {
    let uuid = parse_comment_field("params.uuid", &uuid)?;
    let comment = state
        .worlds
        .find_comment(&uuid)
        .await?
        .ok_or_else(|| comment_not_found(&uuid))?;
    let world = state
        .worlds
        .find_world(&comment.world_uuid)
        .await?
        .ok_or_else(|| comment_not_found(&uuid))?;

    Ok(Json(CommentWithWorld {
        comment,
        from: CommentSource {
            world_uuid: world.world_uuid,
            name: world.name,
            raw_name: world.raw_name,
        },
    }))
}

/// Comments on a world, oldest first unless `sortDirection=descending`.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(world_uuid): Path<String>,
    ValidatedQuery(query): ValidatedQuery<CommentListQuery>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let world_uuid = parse_world_field("params.world_uuid", &world_uuid)?;
    if state.worlds.find_world(&world_uuid).await?.is_none() {
        return Err(AppError::NotFound(format!("World {}", world_uuid)));
    }

    let comments = state
        .worlds
        .list_comments(&world_uuid, query.direction(), query.window())
        .await?;
    Ok(Json(comments))
}

/// The caller must hold a session for the profile they post as.
pub async fn post_comment(
    State(state): State<AppState>,
    credential: Credential,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> Result<Json<CommentEditResponse>, AppError> {
    let world_uuid = parse_world_field("body.world_uuid", &payload.world_uuid)?;
    let author = parse_profile_field("body.profile_uuid", &payload.profile_uuid)?;
    state.gate.authorize(&credential, &author).await?;

    if state.worlds.find_world(&world_uuid).await?.is_none() {
        return Err(AppError::NotFound(format!("World {}", world_uuid)));
    }

    let comment = Comment {
        uuid: CommentId::new(),
        world_uuid,
        profile_uuid: author.standard(),
        content: payload.content,
        date: state.clock.now_unix(),
    };
    state.worlds.insert_comment(&comment).await?;
    tracing::info!(comment_uuid = %comment.uuid, world_uuid = %world_uuid, "Comment posted");

    Ok(Json(CommentEditResponse { edit: comment }))
}

/// Only the author may delete a comment.
pub async fn delete_comment(
    State(state): State<AppState>,
    credential: Credential,
    ValidatedJson(payload): ValidatedJson<CommentDeleteRequest>,
) -> Result<Json<CommentRemovedResponse>, AppError> {
    let uuid = parse_comment_field("body.uuid", &payload.uuid)?;
    let comment = state
        .worlds
        .find_comment(&uuid)
        .await?
        .ok_or_else(|| comment_not_found(&uuid))?;
    let author = stored_owner(&comment.profile_uuid)?;
    state.gate.authorize(&credential, &author).await?;

    if !state.worlds.delete_comment(&uuid).await? {
        return Err(comment_not_found(&uuid));
    }
    tracing::info!(comment_uuid = %uuid, "Comment deleted");

    Ok(Json(CommentRemovedResponse {
        edit: RemovedComment { removed_uuid: uuid },
    }))
}
