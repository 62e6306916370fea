// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project repository.

use async_trait::async_trait;
use chartroom_server_auth::{Project, ProjectId, TeamId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{timestamp_column, uuid_column};

#[async_trait]
pub trait ProjectStore: Send + Sync {
	async fn create_project(&self, project: &Project) -> Result<(), DbError>;
	async fn get_project_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DbError>;
	async fn list_projects_for_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DbError>;
}

#[derive(Clone)]
pub struct ProjectRepository {
	pool: SqlitePool,
}

impl ProjectRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a project.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` if the owning team does not exist.
	#[tracing::instrument(skip(self, project), fields(project_id = %project.id, team_id = %project.team_id))]
	pub async fn create_project(&self, project: &Project) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO projects (id, team_id, name, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(project.id.to_string())
		.bind(project.team_id.to_string())
		.bind(&project.name)
		.bind(project.created_at.to_rfc3339())
		.bind(project.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(project_id = %project.id, "project created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(project_id = %id))]
	pub async fn get_project_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, team_id, name, created_at, updated_at
			FROM projects
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_project(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(team_id = %team_id))]
	pub async fn list_projects_for_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, team_id, name, created_at, updated_at
			FROM projects
			WHERE team_id = ?
			ORDER BY name
			"#,
		)
		.bind(team_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_project).collect()
	}
}

#[async_trait]
impl ProjectStore for ProjectRepository {
	async fn create_project(&self, project: &Project) -> Result<(), DbError> {
		self.create_project(project).await
	}

	async fn get_project_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DbError> {
		self.get_project_by_id(id).await
	}

	async fn list_projects_for_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DbError> {
		self.list_projects_for_team(team_id).await
	}
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, DbError> {
	Ok(Project {
		id: ProjectId::new(uuid_column(row, "id")?),
		team_id: TeamId::new(uuid_column(row, "team_id")?),
		name: row.get("name"),
		created_at: timestamp_column(row, "created_at")?,
		updated_at: timestamp_column(row, "updated_at")?,
	})
}
