use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A header or body field is missing, mistyped or out of bounds, or the
    /// submitted access token could not be resolved to an identity.
    #[error("{field} is invalid: {reason}")]
    Format { field: String, reason: String },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),
    #[error(transparent)]
    InternalServerError(anyhow::Error),
}

impl AppError {
    pub fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Format {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Format { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IdentityProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Format { .. } => "FORMAT_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::IdentityProviderUnavailable(_) => "IDENTITY_PROVIDER_UNAVAILABLE",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let (error_message, details) = match self {
            AppError::Format { field, reason } => (
                format!("{} is missing or malformed", field),
                Some(serde_json::json!({ "field": field, "reason": reason })),
            ),
            AppError::Unauthorized(msg) => (msg, None),
            AppError::NotFound(what) => (format!("{} does not exist", what), None),
            AppError::IdentityProviderUnavailable(msg) => {
                tracing::warn!(reason = %msg, "Identity provider unavailable");
                ("Identity provider unavailable, try again later".to_string(), None)
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                ("Internal server error".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::format("Request body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::format("Request query", rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::from_validation("body", &errors)
    }
}

impl AppError {
    /// First failing field under `prefix` (`body`, `query`), in path order.
    pub fn from_validation(prefix: &str, errors: &validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_validation_errors(prefix, errors, &mut fields);
        fields.sort();

        match fields.into_iter().next() {
            Some((field, reason)) => AppError::Format { field, reason },
            None => AppError::format(prefix, "validation failed"),
        }
    }
}

/// Flattens nested validator output into `(path, reason)` pairs such as
/// `("body.edits.description", "length")`. Struct-level errors report the
/// path of the struct itself.
fn collect_validation_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<(String, String)>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if field == "__all__" {
            prefix.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push((path.clone(), reason));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let response = AppError::format("body.profile_uuid", "invalid uuid").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["code"], "FORMAT_ERROR");
        assert_eq!(json["details"]["field"], "body.profile_uuid");
        assert_eq!(json["details"]["reason"], "invalid uuid");

        let response = AppError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Unauthorized");
        assert_eq!(json["code"], "UNAUTHORIZED");

        let response = AppError::NotFound("World abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"], "World abc does not exist");
        assert_eq!(json["code"], "NOT_FOUND");

        let response =
            AppError::IdentityProviderUnavailable("timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = response_json(response).await;
        assert_eq!(json["code"], "IDENTITY_PROVIDER_UNAVAILABLE");
    }

    #[tokio::test]
    async fn app_error_internal_maps_to_generic_message() {
        let response = AppError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
        assert!(json["details"].is_null());
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        b_field: String,
        #[validate(length(max = 2))]
        a_field: String,
    }

    #[test]
    fn validation_errors_report_first_field_in_order() {
        let payload = Payload {
            b_field: String::new(),
            a_field: "abc".to_string(),
        };
        let err = AppError::from(payload.validate().expect_err("invalid payload"));
        match err {
            AppError::Format { field, reason } => {
                assert_eq!(field, "body.a_field");
                assert_eq!(reason, "length");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
