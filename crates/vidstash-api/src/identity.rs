//! Caller identity for like/unlike operations.
//!
//! Session handling is an external collaborator; by the time a request gets
//! here the authenticated principal is expected in the `X-User` header. The
//! extractor only asserts the header is present and non-empty.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::HttpAppError;
use vidstash_core::AppError;

/// Header carrying the authenticated user id.
pub const USER_HEADER: &str = "x-user";

/// Opaque identity of the requesting user.
#[derive(Debug, Clone)]
pub struct UserIdentity(pub String);

impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| UserIdentity(user.to_string()))
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(format!(
                    "Missing {} header",
                    USER_HEADER
                )))
            })
    }
}
