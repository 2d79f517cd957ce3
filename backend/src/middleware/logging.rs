use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use std::time::Instant;

use crate::middleware::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 512;

/// Logs every 4xx/5xx response with a preview of its body. Error bodies are
/// built by `AppError` and never carry credentials, so the preview is safe to
/// log; request bodies are never read here.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let event = ErrorEvent {
        status: status.as_u16(),
        method: &method,
        path: &path,
        request_id: &request_id,
        latency_ms: start.elapsed().as_millis() as u64,
    };
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, preview)) => {
            event.log(&preview);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            event.log_unreadable(&err);
            Response::from_parts(parts, Body::empty())
        }
    }
}

async fn buffer_body(body: Body) -> Result<(Bytes, String), AxumError> {
    let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES).await?;
    Ok((bytes.clone(), body_preview(&bytes)))
}

fn body_preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

struct ErrorEvent<'a> {
    status: u16,
    method: &'a str,
    path: &'a str,
    request_id: &'a str,
    latency_ms: u64,
}

impl ErrorEvent<'_> {
    fn log(&self, body: &str) {
        let Self {
            status,
            method,
            path,
            request_id,
            latency_ms,
        } = *self;
        if status >= 500 {
            tracing::error!(status, method, path, request_id, latency_ms, body, "Request failed");
        } else {
            tracing::warn!(status, method, path, request_id, latency_ms, body, "Request rejected");
        }
    }

    fn log_unreadable(&self, err: &AxumError) {
        let Self {
            status,
            method,
            path,
            request_id,
            latency_ms,
        } = *self;
        tracing::error!(
            status,
            method,
            path,
            request_id,
            latency_ms,
            error = %err,
            "Failed to read error response body"
        );
    }
}
