// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Built-in saved query grants.

use crate::rbac::{Action, Grant, ResourceType};
use crate::TeamRole;

/// Grants used when no policy file is configured.
///
/// | role   | create | read | update | delete |
/// |--------|--------|------|--------|--------|
/// | owner  | any    | any  | any    | any    |
/// | admin  | any    | any  | any    | any    |
/// | editor | any    | any  | any    | -      |
/// | viewer | -      | any  | -      | -      |
pub fn default_grants() -> Vec<Grant> {
	let sq = ResourceType::SavedQuery;
	let mut grants = Vec::new();

	for role in [TeamRole::Owner, TeamRole::Admin] {
		for action in Action::all() {
			grants.push(Grant::any(role, *action, sq));
		}
	}

	for action in [Action::Create, Action::Read, Action::Update] {
		grants.push(Grant::any(TeamRole::Editor, action, sq));
	}

	grants.push(Grant::any(TeamRole::Viewer, Action::Read, sq));
	grants
}
