// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RBAC policy evaluation engine.
//!
//! [`AccessControl`] is a table of [`Grant`]s keyed by role. Queries are
//! answered by lookup only:
//!
//! 1. **Deny by default**: a role with no matching grant is denied
//! 2. **Any implies own**: an `Any` grant satisfies an `Own` query for the same action
//!
//! The table is immutable once built and shared behind the [`PolicyEngine`]
//! trait, so evaluation is a pure function of (role, action, resource, possession).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::instrument;

use super::policies::saved_query;
use super::types::{Action, Grant, Permission, Possession, ResourceType};
use crate::TeamRole;

/// Decides whether a role may perform an action on a resource type.
pub trait PolicyEngine: Send + Sync {
	fn evaluate(
		&self,
		role: TeamRole,
		action: Action,
		resource: ResourceType,
		possession: Possession,
	) -> Permission;
}

/// Errors raised while loading a policy table.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
	#[error("failed to read policy file {path}: {source}")]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse policy: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("policy contains no grants")]
	Empty,
}

#[derive(Debug, Deserialize)]
struct PolicyFile {
	#[serde(default)]
	grants: Vec<Grant>,
}

type GrantKey = (ResourceType, Action, Possession);

/// In-memory grant table.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
	grants: HashMap<TeamRole, HashSet<GrantKey>>,
}

impl AccessControl {
	/// Creates an empty table that denies everything.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a table holding the built-in grants.
	pub fn with_default_grants() -> Self {
		Self::from_grants(saved_query::default_grants())
	}

	/// Creates a table from an explicit list of grants.
	pub fn from_grants(grants: impl IntoIterator<Item = Grant>) -> Self {
		let mut ac = Self::new();
		for grant in grants {
			ac.grant(grant);
		}
		ac
	}

	/// Parses a TOML policy document made of `[[grants]]` tables.
	pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
		let file: PolicyFile = toml::from_str(content)?;
		if file.grants.is_empty() {
			return Err(PolicyError::Empty);
		}
		Ok(Self::from_grants(file.grants))
	}

	/// Loads a TOML policy document from disk.
	#[instrument(skip_all, fields(path = %path.as_ref().display()))]
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Read {
			path: path.display().to_string(),
			source: e,
		})?;
		let ac = Self::from_toml_str(&content)?;
		tracing::debug!(grants = ac.len(), "policy file loaded");
		Ok(ac)
	}

	/// Adds a grant to the table.
	pub fn grant(&mut self, grant: Grant) -> &mut Self {
		self
			.grants
			.entry(grant.role)
			.or_default()
			.insert((grant.resource, grant.action, grant.possession));
		self
	}

	/// Number of grants in the table.
	pub fn len(&self) -> usize {
		self.grants.values().map(HashSet::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn has(&self, role: TeamRole, key: GrantKey) -> bool {
		self
			.grants
			.get(&role)
			.map(|set| set.contains(&key))
			.unwrap_or(false)
	}

	fn is_granted(
		&self,
		role: TeamRole,
		action: Action,
		resource: ResourceType,
		possession: Possession,
	) -> bool {
		if self.has(role, (resource, action, Possession::Any)) {
			return true;
		}
		possession == Possession::Own && self.has(role, (resource, action, Possession::Own))
	}
}

impl PolicyEngine for AccessControl {
	#[instrument(level = "debug", skip(self), fields(%role, %action, %resource, %possession))]
	fn evaluate(
		&self,
		role: TeamRole,
		action: Action,
		resource: ResourceType,
		possession: Possession,
	) -> Permission {
		let granted = self.is_granted(role, action, resource, possession);
		tracing::debug!(granted, "policy evaluated");
		Permission {
			granted,
			role,
			action,
			resource,
			possession,
		}
	}
}
