// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication context extracted from requests.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user context
//! - [`AuthContext`] - auth state for request processing
//! - [`extract_bearer_token`] - reads `Authorization: Bearer <token>`
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Bearer Token → Hash → Session lookup → AuthContext
//! ```
//!
//! Token values are never logged.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{SessionId, User, UserId};

/// The currently authenticated user, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	/// The authenticated user.
	pub user: User,
	/// Session the request was authenticated with.
	pub session_id: SessionId,
}

impl CurrentUser {
	pub fn from_session(user: User, session_id: SessionId) -> Self {
		Self { user, session_id }
	}

	/// The identity every authorization decision is made for.
	pub fn actor_user_id(&self) -> UserId {
		self.user.id
	}
}

/// Authentication context for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// The current user, if authenticated.
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self { current_user: None }
	}

	/// Create a new authenticated context.
	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	/// Require authentication, returning the current user or an error.
	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("authentication required")]
pub struct AuthRequired;

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`. Returns `None` when the
/// header is missing, not valid UTF-8, uses another scheme, or carries an
/// empty token.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}
