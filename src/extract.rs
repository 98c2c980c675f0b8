//! Extractors whose rejections render as [`ApiError`] envelopes, plus helpers
//! for telling an absent JSON key apart from an explicit `null`.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, ApiResult};

/// JSON body: syntax errors become 400, shape errors 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string: malformed input becomes 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters: anything that does not parse is treated as an unknown route.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>` field: outer `None` means the key was absent, inner
/// `None` means it was `null`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unwrap a required body field, rejecting absent and null alike with 422.
pub fn required<T>(name: &str, field: Option<Option<T>>) -> ApiResult<T> {
    match field {
        Some(Some(value)) => Ok(value),
        Some(None) => Err(ApiError::Unprocessable(format!("`{name}` is null"))),
        None => Err(ApiError::Unprocessable(format!("`{name}` is missing"))),
    }
}
