// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer-session authentication extractor.
//!
//! ```text
//! Authorization: Bearer <token> → sha256 hex → sessions lookup → CurrentUser
//! ```
//!
//! Handlers that take [`RequireAuth`] never run for an unauthenticated request;
//! the extractor rejects it with 401 before the pipeline is reached.

use axum::{extract::FromRequestParts, http::request::Parts};
use chartroom_server_auth::{
	middleware::{extract_bearer_token, AuthContext, CurrentUser},
	session::hash_token,
};
use chrono::Utc;

use crate::{api::AppState, error::ServerError};

/// Extractor yielding the authenticated user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let ctx = resolve_auth_context(parts, state).await?;
		let current_user = ctx.require_user()?.clone();
		Ok(RequireAuth(current_user))
	}
}

/// Build the [`AuthContext`] for a request.
///
/// A missing, unknown or expired token yields an unauthenticated context. A
/// store failure is an internal error.
pub async fn resolve_auth_context(
	parts: &Parts,
	state: &AppState,
) -> Result<AuthContext, ServerError> {
	let Some(token) = extract_bearer_token(&parts.headers) else {
		tracing::debug!("no bearer token on request");
		return Ok(AuthContext::unauthenticated());
	};

	let token_hash = hash_token(&token);
	match state
		.session_repo
		.get_session_user_by_token_hash(&token_hash, Utc::now())
		.await
	{
		Ok(Some((session, user))) => {
			tracing::debug!(user_id = %user.id, session_id = %session.id, "session authenticated");
			Ok(AuthContext::authenticated(CurrentUser::from_session(
				user, session.id,
			)))
		}
		Ok(None) => {
			tracing::debug!("bearer token did not match a live session");
			Ok(AuthContext::unauthenticated())
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up session");
			Err(ServerError::Database(e))
		}
	}
}
