#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::status::StatusResponse,
    models::{
        auth::{
            CheckSessionResponse, LoginRequest, LoginResponse, ProfileRequest, RefreshResponse,
        },
        world::{
            Comment, CommentDeleteRequest, CommentEditResponse, CommentListQuery,
            CommentRemovedResponse, CommentRequest, CommentSource, CommentWithWorld,
            DescriptionEditRequest, EditMessageResponse, RemovedComment, SortDirection,
            UnlistRequest, UnlistResponse, UserContent, World, WorldEdits, WorldPatchRequest,
            WorldPatchResponse,
        },
    },
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        status_doc,
        login_doc,
        check_session_doc,
        refresh_doc,
        get_world_doc,
        patch_world_doc,
        edit_description_doc,
        toggle_unlist_doc,
        list_comments_doc,
        get_comment_doc,
        post_comment_doc,
        delete_comment_doc,
        list_owner_worlds_doc,
        list_owner_worlds_for_caller_doc
    ),
    components(
        schemas(
            ErrorResponse,
            StatusResponse,
            // auth
            LoginRequest,
            LoginResponse,
            ProfileRequest,
            CheckSessionResponse,
            RefreshResponse,
            // worlds
            World,
            UserContent,
            WorldEdits,
            WorldPatchRequest,
            WorldPatchResponse,
            DescriptionEditRequest,
            EditMessageResponse,
            UnlistRequest,
            UnlistResponse,
            // comments
            Comment,
            CommentSource,
            CommentWithWorld,
            CommentRequest,
            CommentEditResponse,
            CommentDeleteRequest,
            RemovedComment,
            CommentRemovedResponse,
            SortDirection
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login, session checks and token rotation"),
        (name = "Worlds", description = "World reads and owner edits"),
        (name = "Comments", description = "World comments"),
        (name = "Owners", description = "Worlds by owner")
    )
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        components.add_security_scheme(
            "SessionToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Session-Token"))),
        );
        components.add_security_scheme(
            "RefreshToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Refresh-Token"))),
        );
        components.add_security_scheme(
            "LegacyBearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = StatusResponse)),
    tag = "Worlds"
)]
fn status_doc() {}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Access token missing or rejected", body = ErrorResponse),
        (status = 503, description = "Identity provider unavailable", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/check-session",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Whether the session token is live for the profile", body = CheckSessionResponse),
        (status = 400, description = "Malformed header or body", body = ErrorResponse)
    ),
    tag = "Auth",
    security(("SessionToken" = []))
)]
fn check_session_doc() {}

#[utoipa::path(
    post,
    path = "/refresh",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Both tokens rotated", body = RefreshResponse),
        (status = 400, description = "Malformed header or body", body = ErrorResponse),
        (status = 401, description = "Refresh token invalid or expired", body = ErrorResponse)
    ),
    tag = "Auth",
    security(("RefreshToken" = []))
)]
fn refresh_doc() {}

#[utoipa::path(
    get,
    path = "/v4/worlds/{world_uuid}",
    params(("world_uuid" = String, Path, description = "World UUID")),
    responses(
        (status = 200, body = World),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Worlds"
)]
fn get_world_doc() {}

#[utoipa::path(
    patch,
    path = "/v4/worlds/{world_uuid}",
    params(("world_uuid" = String, Path, description = "World UUID")),
    request_body = WorldPatchRequest,
    responses(
        (status = 200, description = "Edits applied", body = WorldPatchResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Worlds",
    security(("SessionToken" = []), ("LegacyBearer" = []))
)]
fn patch_world_doc() {}

#[utoipa::path(
    post,
    path = "/world/edit/description",
    request_body = DescriptionEditRequest,
    responses(
        (status = 200, body = EditMessageResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Worlds",
    security(("SessionToken" = []), ("LegacyBearer" = []))
)]
fn edit_description_doc() {}

#[utoipa::path(
    post,
    path = "/world/edit/unlist",
    request_body = UnlistRequest,
    responses(
        (status = 200, description = "Unlisted flag flipped", body = UnlistResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Worlds",
    security(("SessionToken" = []), ("LegacyBearer" = []))
)]
fn toggle_unlist_doc() {}

#[utoipa::path(
    get,
    path = "/v4/worlds/{world_uuid}/comments",
    params(
        ("world_uuid" = String, Path, description = "World UUID"),
        CommentListQuery
    ),
    responses(
        (status = 200, body = Vec<Comment>),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Comments"
)]
fn list_comments_doc() {}

#[utoipa::path(
    get,
    path = "/world/comment/{uuid}",
    params(("uuid" = String, Path, description = "Comment UUID")),
    responses(
        (status = 200, body = CommentWithWorld),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Comments"
)]
fn get_comment_doc() {}

#[utoipa::path(
    post,
    path = "/world/comment",
    request_body = CommentRequest,
    responses(
        (status = 200, body = CommentEditResponse),
        (status = 401, description = "Session does not belong to profile_uuid", body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Comments",
    security(("SessionToken" = []), ("LegacyBearer" = []))
)]
fn post_comment_doc() {}

#[utoipa::path(
    post,
    path = "/world/comment/delete",
    request_body = CommentDeleteRequest,
    responses(
        (status = 200, body = CommentRemovedResponse),
        (status = 401, description = "Caller is not the author", body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Comments",
    security(("SessionToken" = []), ("LegacyBearer" = []))
)]
fn delete_comment_doc() {}

#[utoipa::path(
    get,
    path = "/owner/{owner}",
    params(("owner" = String, Path, description = "Owner profile UUID")),
    responses((status = 200, description = "Listed worlds", body = [World])),
    tag = "Owners"
)]
fn list_owner_worlds_doc() {}

#[utoipa::path(
    post,
    path = "/owner/{owner}",
    params(("owner" = String, Path, description = "Owner profile UUID")),
    responses((status = 200, description = "All worlds for the owner, listed worlds for anyone else", body = [World])),
    tag = "Owners",
    security((), ("SessionToken" = []), ("LegacyBearer" = []))
)]
fn list_owner_worlds_for_caller_doc() {}
