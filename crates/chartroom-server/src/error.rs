// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error type and its single HTTP mapping.

use axum::response::{IntoResponse, Response};
use chartroom_server_api::SavedQueryErrorResponse;
use chartroom_server_auth::middleware::AuthRequired;
use chartroom_server_auth::rbac::PolicyError;
use chartroom_server_config::ConfigError;
use chartroom_server_db::DbError;

use crate::api_response::{bad_request, internal_error, unauthorized};
use crate::pipeline::{ErrorKind, PipelineError};
use crate::validation::IdParseError;

pub const UNAUTHORIZED_MESSAGE: &str = "Not authorized";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("authentication required")]
	Unauthenticated,

	#[error(transparent)]
	Pipeline(#[from] PipelineError),

	#[error(transparent)]
	InvalidId(#[from] IdParseError),

	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("policy error: {0}")]
	Policy(#[from] PolicyError),

	#[error("database error: {0}")]
	Database(#[from] DbError),

	#[error("internal error: {0}")]
	Internal(String),
}

impl From<AuthRequired> for ServerError {
	fn from(_: AuthRequired) -> Self {
		ServerError::Unauthenticated
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::Unauthenticated => {
				unauthorized::<SavedQueryErrorResponse>("unauthorized", UNAUTHORIZED_MESSAGE)
					.into_response()
			}
			ServerError::Pipeline(err) => match err.kind() {
				ErrorKind::Unauthorized => {
					unauthorized::<SavedQueryErrorResponse>("unauthorized", UNAUTHORIZED_MESSAGE)
						.into_response()
				}
				ErrorKind::NotFound => {
					bad_request::<SavedQueryErrorResponse>("not_found", "Resource not found")
						.into_response()
				}
				ErrorKind::StoreFailure => {
					bad_request::<SavedQueryErrorResponse>("store_failure", "Request could not be completed")
						.into_response()
				}
				ErrorKind::InvalidInput => {
					let message = match &err {
						PipelineError::InvalidInput(detail) => detail.clone(),
						other => other.to_string(),
					};
					bad_request::<SavedQueryErrorResponse>("invalid_input", message).into_response()
				}
			},
			ServerError::InvalidId(e) => {
				bad_request::<SavedQueryErrorResponse>(e.error, e.message).into_response()
			}
			ServerError::Config(_)
			| ServerError::Policy(_)
			| ServerError::Database(_)
			| ServerError::Internal(_) => {
				tracing::error!(error = %self, "internal server error");
				internal_error::<SavedQueryErrorResponse>("Internal server error").into_response()
			}
		}
	}
}
