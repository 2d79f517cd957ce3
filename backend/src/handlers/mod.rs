pub mod auth;
pub mod comments;
pub mod owner;
pub mod status;
pub mod worlds;

use crate::error::AppError;
use crate::types::{CommentId, ProfileId, WorldId};

fn parse_profile_field(field: &str, raw: &str) -> Result<ProfileId, AppError> {
    ProfileId::parse(raw).map_err(|err| AppError::format(field, err.to_string()))
}

fn parse_world_field(field: &str, raw: &str) -> Result<WorldId, AppError> {
    raw.parse()
        .map_err(|err: uuid::Error| AppError::format(field, err.to_string()))
}

fn parse_comment_field(field: &str, raw: &str) -> Result<CommentId, AppError> {
    raw.parse()
        .map_err(|err: uuid::Error| AppError::format(field, err.to_string()))
}

/// Owner ids come from stored rows. One that does not parse can never match a
/// caller, so it is treated as not authorized.
fn stored_owner(raw: &str) -> Result<ProfileId, AppError> {
    ProfileId::parse(raw).map_err(|_| {
        tracing::warn!(owner_uuid = raw, "Stored owner id is not a valid profile UUID");
        AppError::unauthorized()
    })
}
