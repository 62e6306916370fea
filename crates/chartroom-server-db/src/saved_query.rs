// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Saved query repository for database operations.
//!
//! Every operation is scoped to a project: a saved query that belongs to
//! another project behaves as if it did not exist.

use async_trait::async_trait;
use chartroom_server_auth::{ProjectId, SavedQueryId, UserId};
use chrono::{SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{timestamp_column, uuid_column};
use crate::types::{NewSavedQuery, SavedQuery, SavedQueryCreator};

#[async_trait]
pub trait SavedQueryStore: Send + Sync {
	async fn find_by_project(
		&self,
		project_id: &ProjectId,
		query_type: Option<&str>,
	) -> Result<Vec<SavedQuery>, DbError>;
	async fn create(&self, new: &NewSavedQuery) -> Result<SavedQuery, DbError>;
	async fn update_summary(
		&self,
		project_id: &ProjectId,
		id: &SavedQueryId,
		summary: &str,
	) -> Result<SavedQuery, DbError>;
	async fn delete(&self, project_id: &ProjectId, id: &SavedQueryId) -> Result<(), DbError>;
}

const SELECT_WITH_CREATOR: &str = r#"
	SELECT sq.id, sq.project_id, sq.user_id, sq.query, sq.summary, sq.type,
	       sq.created_at, sq.updated_at,
	       u.name AS creator_name, u.surname AS creator_surname
	FROM saved_queries sq
	LEFT JOIN users u ON u.id = sq.user_id
"#;

/// Repository for saved query database operations.
#[derive(Clone)]
pub struct SavedQueryRepository {
	pool: SqlitePool,
}

impl SavedQueryRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// List the saved queries of a project, newest first.
	///
	/// # Arguments
	/// * `project_id` - Owning project
	/// * `query_type` - Optional type filter; `None` or an empty string lists all
	#[tracing::instrument(skip(self), fields(project_id = %project_id, query_type = ?query_type))]
	pub async fn find_by_project(
		&self,
		project_id: &ProjectId,
		query_type: Option<&str>,
	) -> Result<Vec<SavedQuery>, DbError> {
		let filter = query_type.filter(|t| !t.is_empty());

		let rows = match filter {
			Some(query_type) => {
				sqlx::query(&format!(
					"{SELECT_WITH_CREATOR} WHERE sq.project_id = ? AND sq.type = ? \
					 ORDER BY sq.created_at DESC, sq.rowid DESC"
				))
				.bind(project_id.to_string())
				.bind(query_type)
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(&format!(
					"{SELECT_WITH_CREATOR} WHERE sq.project_id = ? \
					 ORDER BY sq.created_at DESC, sq.rowid DESC"
				))
				.bind(project_id.to_string())
				.fetch_all(&self.pool)
				.await?
			}
		};

		let queries = rows
			.iter()
			.map(row_to_saved_query)
			.collect::<Result<Vec<_>, _>>()?;

		tracing::debug!(project_id = %project_id, count = queries.len(), "saved queries listed");
		Ok(queries)
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, saved_query_id = %id))]
	pub async fn get(
		&self,
		project_id: &ProjectId,
		id: &SavedQueryId,
	) -> Result<Option<SavedQuery>, DbError> {
		let row = sqlx::query(&format!(
			"{SELECT_WITH_CREATOR} WHERE sq.id = ? AND sq.project_id = ?"
		))
		.bind(id.to_string())
		.bind(project_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_saved_query(&r)).transpose()
	}

	/// Insert a saved query and return the stored record.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` if the project or user does not exist.
	#[tracing::instrument(skip(self, new), fields(project_id = %new.project_id, user_id = %new.user_id))]
	pub async fn create(&self, new: &NewSavedQuery) -> Result<SavedQuery, DbError> {
		let id = SavedQueryId::generate();
		let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

		sqlx::query(
			r#"
			INSERT INTO saved_queries (id, project_id, user_id, query, summary, type, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(new.project_id.to_string())
		.bind(new.user_id.to_string())
		.bind(&new.query)
		.bind(&new.summary)
		.bind(&new.query_type)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		tracing::debug!(saved_query_id = %id, "saved query created");
		self.fetch_existing(&new.project_id, &id).await
	}

	/// Replace the summary of a saved query and bump `updated_at`.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no such query exists in the project.
	#[tracing::instrument(skip(self, summary), fields(project_id = %project_id, saved_query_id = %id))]
	pub async fn update_summary(
		&self,
		project_id: &ProjectId,
		id: &SavedQueryId,
		summary: &str,
	) -> Result<SavedQuery, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE saved_queries
			SET summary = ?, updated_at = ?
			WHERE id = ? AND project_id = ?
			"#,
		)
		.bind(summary)
		.bind(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
		.bind(id.to_string())
		.bind(project_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("saved query {id}")));
		}

		tracing::debug!(saved_query_id = %id, "saved query updated");
		self.fetch_existing(project_id, id).await
	}

	/// Delete a saved query.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no such query exists in the project,
	/// including when it was already deleted.
	#[tracing::instrument(skip(self), fields(project_id = %project_id, saved_query_id = %id))]
	pub async fn delete(&self, project_id: &ProjectId, id: &SavedQueryId) -> Result<(), DbError> {
		let result = sqlx::query("DELETE FROM saved_queries WHERE id = ? AND project_id = ?")
			.bind(id.to_string())
			.bind(project_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("saved query {id}")));
		}

		tracing::debug!(saved_query_id = %id, "saved query deleted");
		Ok(())
	}

	async fn fetch_existing(
		&self,
		project_id: &ProjectId,
		id: &SavedQueryId,
	) -> Result<SavedQuery, DbError> {
		self
			.get(project_id, id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("saved query {id}")))
	}
}

#[async_trait]
impl SavedQueryStore for SavedQueryRepository {
	async fn find_by_project(
		&self,
		project_id: &ProjectId,
		query_type: Option<&str>,
	) -> Result<Vec<SavedQuery>, DbError> {
		self.find_by_project(project_id, query_type).await
	}

	async fn create(&self, new: &NewSavedQuery) -> Result<SavedQuery, DbError> {
		self.create(new).await
	}

	async fn update_summary(
		&self,
		project_id: &ProjectId,
		id: &SavedQueryId,
		summary: &str,
	) -> Result<SavedQuery, DbError> {
		self.update_summary(project_id, id, summary).await
	}

	async fn delete(&self, project_id: &ProjectId, id: &SavedQueryId) -> Result<(), DbError> {
		self.delete(project_id, id).await
	}
}

fn row_to_saved_query(row: &sqlx::sqlite::SqliteRow) -> Result<SavedQuery, DbError> {
	let creator_name: Option<String> = row.get("creator_name");
	let creator = creator_name.map(|name| SavedQueryCreator {
		name,
		surname: row.get("creator_surname"),
	});

	Ok(SavedQuery {
		id: SavedQueryId::new(uuid_column(row, "id")?),
		project_id: ProjectId::new(uuid_column(row, "project_id")?),
		user_id: UserId::new(uuid_column(row, "user_id")?),
		query: row.get("query"),
		summary: row.get("summary"),
		query_type: row.get("type"),
		created_at: timestamp_column(row, "created_at")?,
		updated_at: timestamp_column(row, "updated_at")?,
		creator,
	})
}
