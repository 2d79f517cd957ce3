use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::MAX_REQUEST_BODY_LENGTH, docs::ApiDoc, handlers, middleware, state::AppState};

/// Full API router. Rate limiting is layered on in `main` because it needs
/// the peer address.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allow_origins);

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/check-session", post(handlers::auth::check_session))
        .route("/refresh", post(handlers::auth::refresh));

    let world_routes = Router::new()
        .route(
            "/v4/worlds/{world_uuid}",
            get(handlers::worlds::get_world).patch(handlers::worlds::patch_world),
        )
        .route(
            "/v4/worlds/{world_uuid}/comments",
            get(handlers::comments::list_comments),
        )
        .route(
            "/world/edit/description",
            post(handlers::worlds::edit_description),
        )
        .route("/world/edit/unlist", post(handlers::worlds::toggle_unlist))
        .route("/world/comment", post(handlers::comments::post_comment))
        .route(
            "/world/comment/delete",
            post(handlers::comments::delete_comment),
        )
        .route("/world/comment/{uuid}", get(handlers::comments::get_comment))
        .route(
            "/owner/{owner}",
            get(handlers::owner::list_public).post(handlers::owner::list_for_caller),
        );

    Router::new()
        .route("/", get(handlers::status::status))
        .merge(auth_routes)
        .merge(world_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_LENGTH))
        .layer(axum_middleware::from_fn(middleware::log_error_responses))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
