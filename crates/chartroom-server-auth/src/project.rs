// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Projects: the authorization scope of saved queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, TeamId};

/// A project owned by exactly one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	pub id: ProjectId,

	/// The team whose members' roles govern access to this project.
	pub team_id: TeamId,

	pub name: String,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Project {
	/// Creates a new project with a generated ID and timestamps set to now.
	pub fn new(team_id: TeamId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: ProjectId::generate(),
			team_id,
			name: name.into(),
			created_at: now,
			updated_at: now,
		}
	}
}
