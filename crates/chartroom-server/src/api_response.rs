// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers and macros.
//!
//! - Error response helpers (bad_request, unauthorized, internal_error, ...)
//! - [`parse_id!`] for early-return on malformed path ids
//! - [`impl_api_error_response!`] for `{error, message}` body types

use axum::{http::StatusCode, Json};
use chartroom_server_api::SavedQueryErrorResponse;
use serde::Serialize;

use crate::validation::IdParseError;

/// Trait for API error response types that have `error` and `message` fields.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

/// Implement `ApiErrorResponse` for a struct with `error` and `message` fields.
///
/// # Example
///
/// ```ignore
/// impl_api_error_response!(SavedQueryErrorResponse);
/// ```
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
				Self {
					error: error.into(),
					message: message.into(),
				}
			}
		}
	};
}

impl_api_error_response!(SavedQueryErrorResponse);

/// Parse an ID and return early with an error response if parsing fails.
///
/// # Example
///
/// ```ignore
/// let project_id = parse_id!(SavedQueryErrorResponse, parse_project_id(&project_id));
/// ```
#[macro_export]
macro_rules! parse_id {
	($error_ty:ty, $parse_expr:expr) => {
		match $parse_expr {
			Ok(id) => id,
			Err(e) => {
				return $crate::api_response::id_parse_error::<$error_ty>(e).into_response();
			}
		}
	};
}

/// Create a 400 Bad Request response from an IdParseError.
pub fn id_parse_error<T: ApiErrorResponse>(e: IdParseError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", message)),
	)
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new(error, message)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unauthorized_uses_401() {
		let (status, Json(body)) =
			unauthorized::<SavedQueryErrorResponse>("unauthorized", "Not authorized");
		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body.error, "unauthorized");
		assert_eq!(body.message, "Not authorized");
	}

	#[test]
	fn id_parse_error_is_bad_request() {
		let err = IdParseError {
			error: "invalid_id".to_string(),
			message: "nope".to_string(),
		};
		let (status, Json(body)) = id_parse_error::<SavedQueryErrorResponse>(err);
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "invalid_id");
	}
}
