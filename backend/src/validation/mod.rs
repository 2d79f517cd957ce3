//! Request validation: validated JSON bodies and typed credential headers.
//!
//! Every shape check happens in an extractor, before a handler can touch the
//! store, and fails with `AppError::Format`.

pub mod headers;
pub mod rules;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

pub use headers::{RefreshTokenHeader, SessionTokenHeader};
pub use validator::Validate;

use crate::error::AppError;

/// JSON body that has already passed `Validate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that has already passed `Validate`. Field errors are
/// reported as `query.<field>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::from_validation("query", &errors))?;
        Ok(ValidatedQuery(value))
    }
}
