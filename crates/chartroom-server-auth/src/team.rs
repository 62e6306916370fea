// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Team management types.
//!
//! This module provides:
//! - [`Team`] - the group that owns projects
//! - [`TeamMembership`] - links users to teams with a [`TeamRole`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TeamId, TeamRole, UserId};

/// A team of users sharing a set of projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
	/// Unique identifier for this team.
	pub id: TeamId,

	/// Display name of the team.
	pub name: String,

	/// When the team was created.
	pub created_at: DateTime<Utc>,

	/// When the team was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Team {
	/// Creates a new team with a generated ID and timestamps set to now.
	pub fn new(name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: TeamId::generate(),
			name: name.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// A user's membership in a team.
///
/// There is at most one membership per (team, user) pair; its role is what the
/// policy engine evaluates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMembership {
	/// The team this membership is for.
	pub team_id: TeamId,

	/// The user who is a member.
	pub user_id: UserId,

	/// The user's role within the team.
	pub role: TeamRole,

	/// When this membership was created.
	pub created_at: DateTime<Utc>,
}

impl TeamMembership {
	/// Creates a new team membership with created_at set to now.
	pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole) -> Self {
		Self {
			team_id,
			user_id,
			role,
			created_at: Utc::now(),
		}
	}

	/// Returns true if this member has at least the given role's rank.
	pub fn has_permission_of(&self, role: &TeamRole) -> bool {
		self.role.has_permission_of(role)
	}
}
