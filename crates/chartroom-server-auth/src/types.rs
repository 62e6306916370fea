// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for the entities the
//!   authorization pipeline touches ([`UserId`], [`TeamId`], [`ProjectId`],
//!   [`SavedQueryId`], [`SessionId`]) preventing accidental mixing
//! - **Team roles**: The role a user holds inside a team ([`TeamRole`]), which is
//!   the subject of every access decision
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(SessionId, "Unique identifier for a session.");
define_id_type!(TeamId, "Unique identifier for a team.");
define_id_type!(ProjectId, "Unique identifier for a project.");
define_id_type!(SavedQueryId, "Unique identifier for a saved query.");

// =============================================================================
// Team Roles
// =============================================================================

/// Roles within a team.
///
/// Ordered from most to least privileged. What each role may do is decided by
/// the policy engine, not by the role itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
	/// Created the team; full control.
	Owner,
	/// Manages the team's projects and members.
	Admin,
	/// Works on project content.
	Editor,
	/// Read-only access to project content.
	Viewer,
}

impl TeamRole {
	/// Returns all available team roles.
	pub fn all() -> &'static [TeamRole] {
		&[
			TeamRole::Owner,
			TeamRole::Admin,
			TeamRole::Editor,
			TeamRole::Viewer,
		]
	}

	/// Returns true if this role has at least the rank of the given role.
	pub fn has_permission_of(&self, other: &TeamRole) -> bool {
		self.rank() >= other.rank()
	}

	fn rank(&self) -> u8 {
		match self {
			TeamRole::Owner => 3,
			TeamRole::Admin => 2,
			TeamRole::Editor => 1,
			TeamRole::Viewer => 0,
		}
	}
}

impl fmt::Display for TeamRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TeamRole::Owner => write!(f, "owner"),
			TeamRole::Admin => write!(f, "admin"),
			TeamRole::Editor => write!(f, "editor"),
			TeamRole::Viewer => write!(f, "viewer"),
		}
	}
}

/// Error returned when a role label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown team role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for TeamRole {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"owner" => Ok(TeamRole::Owner),
			"admin" => Ok(TeamRole::Admin),
			"editor" => Ok(TeamRole::Editor),
			"viewer" => Ok(TeamRole::Viewer),
			other => Err(UnknownRole(other.to_string())),
		}
	}
}
