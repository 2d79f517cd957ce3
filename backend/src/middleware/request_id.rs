use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const CORRELATION_ID_HEADER: &str = "x-correlation-id";
const MAX_CLIENT_REQUEST_ID_LENGTH: usize = 128;

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Reuses a client supplied `x-request-id` (or `x-correlation-id`) when it is
/// reasonably short, otherwise mints one. The id is echoed on the response and
/// attached to a span wrapping the rest of the stack.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    let id = req
        .headers()
        .get(&header_name)
        .or_else(|| {
            req.headers()
                .get(HeaderName::from_static(CORRELATION_ID_HEADER))
        })
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_CLIENT_REQUEST_ID_LENGTH)
        .map(|v| v.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(header_name, value);
    }

    response
}
