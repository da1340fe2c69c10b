//! # HTTP handlers
//!
//! One submodule per concern. Every handler answers with the
//! [`ApiResponse`] envelope: successes through [`ok`], failures through
//! [`ApiError`]'s `IntoResponse`. Body, query and path extraction go through
//! the wrappers below so malformed input is reported in the envelope as well.

pub mod admin;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod plants;
pub mod profile;

use axum::extract::{FromRequest, FromRequestParts};
use axum::Json;

use crate::envelope::ApiResponse;
use crate::error::ApiError;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Body<T>(pub T);

/// Query string.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Map a validation message to a 400.
pub(crate) fn check(result: crate::validate::Validation) -> Result<(), ApiError> {
    result.map_err(ApiError::Validation)
}
