use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode};
use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::config::Config;

/// Per-IP limiter for the whole API. Needs the peer address, so the router
/// must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_ip_rate_limiter(
    config: &Config,
) -> anyhow::Result<GovernorLayer<PeerIpKeyExtractor, StateInformationMiddleware, Body>> {
    let burst_size = config.rate_limit_ip_max_requests.max(1);
    let window_seconds = config.rate_limit_ip_window_seconds.max(1);
    let replenish_every = Duration::from_secs(window_seconds) / burst_size;
    let governor_conf = GovernorConfigBuilder::default()
        .period(replenish_every.max(Duration::from_millis(1)))
        .burst_size(burst_size)
        .key_extractor(PeerIpKeyExtractor)
        .use_headers()
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)).error_handler(rate_limit_error_handler))
}

fn rate_limit_error_handler(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "Rate limit exceeded");
            let mut response = json_error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests. Please try again later.",
                Some(wait_time),
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => json_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "RATE_LIMIT_KEY_ERROR",
            "Unable to determine request origin.",
            None,
        ),
        GovernorError::Other { code, msg, headers } => {
            let mut response = json_error_response(
                code,
                "RATE_LIMIT_ERROR",
                &msg.unwrap_or_else(|| "Rate limit error".to_string()),
                None,
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// Same `{ error, code }` shape as `AppError` responses.
fn json_error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    retry_after: Option<u64>,
) -> Response<Body> {
    let mut body = serde_json::json!({
        "error": message,
        "code": code,
    });
    if let Some(retry_after) = retry_after {
        body["details"] = serde_json::json!({ "retry_after": retry_after });
    }

    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(retry_after) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert("retry-after", value);
        }
    }
    response
}
