// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for RBAC policy evaluation.
//!
//! - [`Action`]: The operation being performed (create, read, update, delete)
//! - [`Possession`]: Whether the grant covers only the actor's own records or any record
//! - [`ResourceType`]: The kind of resource being accessed
//! - [`Grant`]: One row of the policy table: (role, resource, action, possession)
//! - [`Permission`]: The outcome of a single policy query
//!
//! All types serialize with snake_case labels so that policy files and audit
//! logs read the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TeamRole;

/// Types of resources that can be protected by the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	SavedQuery,
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceType::SavedQuery => write!(f, "saved_query"),
		}
	}
}

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Create,
	Read,
	Update,
	Delete,
}

impl Action {
	/// Returns all actions.
	pub fn all() -> &'static [Action] {
		&[Action::Create, Action::Read, Action::Update, Action::Delete]
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::Create => write!(f, "create"),
			Action::Read => write!(f, "read"),
			Action::Update => write!(f, "update"),
			Action::Delete => write!(f, "delete"),
		}
	}
}

/// Record ownership scope of a grant.
///
/// An `Any` grant also satisfies an `Own` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Possession {
	/// Only records created by the actor.
	Own,
	/// Every record regardless of creator.
	Any,
}

impl fmt::Display for Possession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Possession::Own => write!(f, "own"),
			Possession::Any => write!(f, "any"),
		}
	}
}

/// A single entry in the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
	pub role: TeamRole,
	pub resource: ResourceType,
	pub action: Action,
	pub possession: Possession,
}

impl Grant {
	/// Grants `action` on any record of `resource` to `role`.
	pub fn any(role: TeamRole, action: Action, resource: ResourceType) -> Self {
		Self {
			role,
			resource,
			action,
			possession: Possession::Any,
		}
	}

	/// Grants `action` on the role holder's own records of `resource`.
	pub fn own(role: TeamRole, action: Action, resource: ResourceType) -> Self {
		Self {
			role,
			resource,
			action,
			possession: Possession::Own,
		}
	}
}

/// Result of a policy query.
///
/// Carries the full query alongside the decision so that callers can log
/// exactly what was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
	pub granted: bool,
	pub role: TeamRole,
	pub action: Action,
	pub resource: ResourceType,
	pub possession: Possession,
}
