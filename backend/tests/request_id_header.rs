mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;
use uuid::Uuid;

fn test_router() -> axum::Router {
    axum::Router::new()
        .route("/test", axum::routing::get(|| async { "ok" }))
        .layer(axum::middleware::from_fn(
            legitidevs_backend::middleware::request_id,
        ))
}

#[tokio::test]
async fn request_id_header_added_to_response() {
    let response = test_router()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn request_id_header_persists_client_id() {
    let client_id = "client-req-123";
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-request-id", client_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), client_id);
}

#[tokio::test]
async fn request_id_header_persists_correlation_id() {
    let correlation_id = "corr-req-456";
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-correlation-id", correlation_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), correlation_id);
}

#[tokio::test]
async fn oversized_client_id_is_replaced() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-request-id", "r".repeat(200))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn full_router_tags_error_responses() {
    let app = support::TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v4/worlds/not-a-uuid")
                .header("x-request-id", "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}
