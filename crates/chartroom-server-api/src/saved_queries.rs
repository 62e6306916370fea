// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Saved query request and response types.
//!
//! Request bodies ignore unknown fields. In particular a caller cannot set
//! `project_id` or `user_id`; both come from the request scope.

use chartroom_server_db::{SavedQuery, SavedQueryCreator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// A saved query in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SavedQueryResponse {
	pub id: String,
	/// Project the query belongs to.
	pub project_id: String,
	/// User who created the query.
	pub user_id: String,
	/// The saved query text.
	pub query: String,
	/// Human-readable label.
	pub summary: String,
	/// Classification tag; empty when unset.
	#[serde(rename = "type")]
	pub query_type: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub creator: Option<SavedQueryCreatorResponse>,
}

/// Display info of a saved query's creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SavedQueryCreatorResponse {
	pub name: String,
	pub surname: Option<String>,
}

impl SavedQueryCreatorResponse {
	/// "NAME SURNAME", or just the name when there is no surname.
	pub fn display_name(&self) -> String {
		match self.surname.as_deref() {
			Some(surname) if !surname.is_empty() => format!("{} {}", self.name, surname),
			_ => self.name.clone(),
		}
	}
}

impl From<SavedQueryCreator> for SavedQueryCreatorResponse {
	fn from(creator: SavedQueryCreator) -> Self {
		Self {
			name: creator.name,
			surname: creator.surname,
		}
	}
}

impl From<SavedQuery> for SavedQueryResponse {
	fn from(query: SavedQuery) -> Self {
		Self {
			id: query.id.to_string(),
			project_id: query.project_id.to_string(),
			user_id: query.user_id.to_string(),
			query: query.query,
			summary: query.summary,
			query_type: query.query_type,
			created_at: query.created_at,
			updated_at: query.updated_at,
			creator: query.creator.map(Into::into),
		}
	}
}

/// Query parameters for listing saved queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListSavedQueriesQuery {
	/// Only return queries of this type. Empty or absent returns all.
	#[serde(rename = "type", default)]
	pub query_type: Option<String>,
}

/// Request to create a saved query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateSavedQueryRequest {
	/// Human-readable label; must not be blank.
	#[serde(default)]
	pub summary: String,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub query_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub query: Option<String>,
}

/// Request to change a saved query's summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateSavedQueryRequest {
	#[serde(default)]
	pub summary: String,
}

/// Deletion confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RemoveSavedQueryResponse {
	pub id: String,
	pub deleted: bool,
}

/// Error response for saved query operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SavedQueryErrorResponse {
	pub error: String,
	pub message: String,
}
