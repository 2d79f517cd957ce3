//! Worlds scraped into the store and the user content layered on top of them.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::config::{
    DEFAULT_COMMENT_PAGE_SIZE, MAX_UUID_LENGTH, MAX_WORLD_COMMENT_LENGTH,
    MAX_WORLD_DESCRIPTION_LENGTH,
};
use crate::types::{CommentId, WorldId};
use crate::validation::rules::{validate_profile_uuid, validate_world_uuid};

/// Fields owned by this service rather than the scraper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unlisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct World {
    pub world_uuid: WorldId,
    /// Hyphenated profile UUID of the owner.
    pub owner_uuid: String,
    /// Plaintext name.
    pub name: String,
    /// JSON text component of the name.
    pub raw_name: String,
    pub description: String,
    pub raw_description: String,
    pub version: String,
    pub locked: bool,
    pub player_count: i32,
    pub visits: i32,
    pub votes: i32,
    pub creation_date_unix_seconds: i64,
    pub last_scraped: i64,
    pub legitidevs: UserContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub uuid: CommentId,
    pub world_uuid: WorldId,
    /// Hyphenated profile UUID of the author.
    pub profile_uuid: String,
    pub content: String,
    /// Unix seconds.
    pub date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentSource {
    pub world_uuid: WorldId,
    pub name: String,
    pub raw_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentWithWorld {
    #[serde(flatten)]
    pub comment: Comment,
    pub from: CommentSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_edits_not_empty", skip_on_field_errors = false))]
pub struct WorldEdits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_WORLD_DESCRIPTION_LENGTH))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlisted: Option<bool>,
}

impl WorldEdits {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.unlisted.is_none()
    }
}

fn validate_edits_not_empty(edits: &WorldEdits) -> Result<(), ValidationError> {
    if edits.is_empty() {
        let mut err = ValidationError::new("edits_empty");
        err.message = Some("Required at least one field".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct WorldPatchRequest {
    #[serde(default)]
    #[validate(nested)]
    pub edits: WorldEdits,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorldPatchResponse {
    pub world_uuid: WorldId,
    pub edits: WorldEdits,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct DescriptionEditRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_world_uuid")
    )]
    pub world_uuid: String,
    #[serde(default)]
    #[validate(length(max = MAX_WORLD_DESCRIPTION_LENGTH))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UnlistRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_world_uuid")
    )]
    pub world_uuid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditMessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnlistResponse {
    pub message: String,
    pub unlisted: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_world_uuid")
    )]
    pub world_uuid: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_profile_uuid")
    )]
    pub profile_uuid: String,
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_WORLD_COMMENT_LENGTH))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommentDeleteRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_UUID_LENGTH),
        custom(function = "validate_world_uuid")
    )]
    pub uuid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentEditResponse {
    pub edit: Comment,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemovedComment {
    pub removed_uuid: CommentId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentRemovedResponse {
    pub edit: RemovedComment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Slice of a sorted comment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentWindow {
    /// `None` returns everything after `offset`.
    pub limit: Option<u32>,
    pub offset: u64,
}

/// Query string of `GET /v4/worlds/{world_uuid}/comments`.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CommentListQuery {
    /// Zero-based page. Pages are `max` comments long, or the default page size.
    pub page: Option<u32>,
    /// Without `page`, caps the number of comments returned.
    #[validate(range(min = 1))]
    pub max: Option<u32>,
    /// Order by comment date. Defaults to ascending.
    pub sort_direction: Option<SortDirection>,
}

impl CommentListQuery {
    pub fn direction(&self) -> SortDirection {
        self.sort_direction.unwrap_or_default()
    }

    pub fn window(&self) -> CommentWindow {
        match self.page {
            Some(page) => {
                let size = self.max.unwrap_or(DEFAULT_COMMENT_PAGE_SIZE);
                CommentWindow {
                    limit: Some(size),
                    offset: u64::from(page) * u64::from(size),
                }
            }
            None => CommentWindow {
                limit: self.max,
                offset: 0,
            },
        }
    }
}
