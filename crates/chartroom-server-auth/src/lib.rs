// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity, team membership and RBAC policy evaluation for Chartroom.
//!
//! Every saved query belongs to a [`Project`], every project to a [`Team`], and
//! a user's [`TeamRole`] in that team is the subject of the access decision made
//! by a [`PolicyEngine`].

pub mod middleware;
pub mod project;
pub mod rbac;
pub mod session;
pub mod team;
pub mod types;
pub mod user;

pub use middleware::{AuthContext, CurrentUser};
pub use project::Project;
pub use rbac::{AccessControl, Action, Grant, Permission, PolicyEngine, Possession, ResourceType};
pub use team::{Team, TeamMembership};
pub use types::{ProjectId, SavedQueryId, SessionId, TeamId, TeamRole, UserId};
pub use user::User;
