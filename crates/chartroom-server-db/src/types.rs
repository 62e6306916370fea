// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chartroom_server_auth::{ProjectId, SavedQueryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved query stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
	pub id: SavedQueryId,
	pub project_id: ProjectId,
	pub user_id: UserId,
	pub query: String,
	pub summary: String,
	#[serde(rename = "type")]
	pub query_type: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	/// Present on list results when the creator still exists.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub creator: Option<SavedQueryCreator>,
}

/// Display info of the user who created a saved query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQueryCreator {
	pub name: String,
	pub surname: Option<String>,
}

/// Insert payload. `project_id` and `user_id` come from the resolved request
/// scope, never from the request body.
#[derive(Debug, Clone)]
pub struct NewSavedQuery {
	pub project_id: ProjectId,
	pub user_id: UserId,
	pub query: String,
	pub summary: String,
	pub query_type: String,
}
