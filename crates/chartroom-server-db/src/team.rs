// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Team repository for database operations.
//!
//! This module provides database access for:
//! - Team creation and lookup
//! - Membership management, one role per (team, user)
//! - Role resolution used by authorization

use async_trait::async_trait;
use chartroom_server_auth::{Team, TeamId, TeamMembership, TeamRole, UserId};
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{timestamp_column, uuid_column};

#[async_trait]
pub trait TeamStore: Send + Sync {
	async fn create_team(&self, team: &Team) -> Result<(), DbError>;
	async fn get_team_by_id(&self, id: &TeamId) -> Result<Option<Team>, DbError>;
	async fn add_member(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
		role: TeamRole,
	) -> Result<(), DbError>;
	async fn get_membership(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamMembership>, DbError>;
	async fn get_team_role(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamRole>, DbError>;
}

/// Repository for team database operations.
#[derive(Clone)]
pub struct TeamRepository {
	pool: SqlitePool,
}

impl TeamRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, team), fields(team_id = %team.id))]
	pub async fn create_team(&self, team: &Team) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO teams (id, name, created_at, updated_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(team.id.to_string())
		.bind(&team.name)
		.bind(team.created_at.to_rfc3339())
		.bind(team.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(team_id = %team.id, "team created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(team_id = %id))]
	pub async fn get_team_by_id(&self, id: &TeamId) -> Result<Option<Team>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, created_at, updated_at
			FROM teams
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_team(&r)).transpose()
	}

	/// Add a user to a team, replacing any previous role.
	#[tracing::instrument(skip(self), fields(team_id = %team_id, user_id = %user_id, role = %role))]
	pub async fn add_member(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
		role: TeamRole,
	) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO team_members (team_id, user_id, role, created_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT (team_id, user_id) DO UPDATE SET role = excluded.role
			"#,
		)
		.bind(team_id.to_string())
		.bind(user_id.to_string())
		.bind(role.to_string())
		.bind(Utc::now().to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(team_id = %team_id, user_id = %user_id, role = %role, "team member added");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(team_id = %team_id, user_id = %user_id))]
	pub async fn get_membership(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamMembership>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT team_id, user_id, role, created_at
			FROM team_members
			WHERE team_id = ? AND user_id = ?
			"#,
		)
		.bind(team_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_membership(&r)).transpose()
	}

	/// Resolve the role a user holds in a team.
	///
	/// # Returns
	/// `None` when the user is not a member.
	#[tracing::instrument(skip(self), fields(team_id = %team_id, user_id = %user_id))]
	pub async fn get_team_role(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamRole>, DbError> {
		Ok(
			self
				.get_membership(team_id, user_id)
				.await?
				.map(|membership| membership.role),
		)
	}

	fn row_to_team(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Team, DbError> {
		Ok(Team {
			id: TeamId::new(uuid_column(row, "id")?),
			name: row.get("name"),
			created_at: timestamp_column(row, "created_at")?,
			updated_at: timestamp_column(row, "updated_at")?,
		})
	}

	fn row_to_membership(&self, row: &sqlx::sqlite::SqliteRow) -> Result<TeamMembership, DbError> {
		let role_str: String = row.get("role");
		let role = role_str
			.parse::<TeamRole>()
			.map_err(|e| DbError::Internal(format!("Invalid role: {e}")))?;

		Ok(TeamMembership {
			team_id: TeamId::new(uuid_column(row, "team_id")?),
			user_id: UserId::new(uuid_column(row, "user_id")?),
			role,
			created_at: timestamp_column(row, "created_at")?,
		})
	}
}

#[async_trait]
impl TeamStore for TeamRepository {
	async fn create_team(&self, team: &Team) -> Result<(), DbError> {
		self.create_team(team).await
	}

	async fn get_team_by_id(&self, id: &TeamId) -> Result<Option<Team>, DbError> {
		self.get_team_by_id(id).await
	}

	async fn add_member(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
		role: TeamRole,
	) -> Result<(), DbError> {
		self.add_member(team_id, user_id, role).await
	}

	async fn get_membership(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamMembership>, DbError> {
		self.get_membership(team_id, user_id).await
	}

	async fn get_team_role(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
	) -> Result<Option<TeamRole>, DbError> {
		self.get_team_role(team_id, user_id).await
	}
}
