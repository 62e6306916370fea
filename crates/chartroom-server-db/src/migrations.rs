// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema bootstrap.
//!
//! Every statement is idempotent so `run_migrations` can run on each start.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[(&str, &str)] = &[
	(
		"users",
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			surname TEXT,
			email TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"teams",
		r#"
		CREATE TABLE IF NOT EXISTS teams (
			id TEXT PRIMARY KEY,
			name TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"team_members",
		r#"
		CREATE TABLE IF NOT EXISTS team_members (
			team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			role TEXT NOT NULL CHECK (role IN ('owner', 'admin', 'editor', 'viewer')),
			created_at TEXT NOT NULL,
			PRIMARY KEY (team_id, user_id)
		)
		"#,
	),
	(
		"projects",
		r#"
		CREATE TABLE IF NOT EXISTS projects (
			id TEXT PRIMARY KEY,
			team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
			name TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"saved_queries",
		r#"
		CREATE TABLE IF NOT EXISTS saved_queries (
			id TEXT PRIMARY KEY,
			project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
			user_id TEXT NOT NULL REFERENCES users(id),
			query TEXT NOT NULL DEFAULT '',
			summary TEXT NOT NULL,
			type TEXT NOT NULL DEFAULT '',
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"idx_saved_queries_project",
		"CREATE INDEX IF NOT EXISTS idx_saved_queries_project ON saved_queries(project_id, type)",
	),
	(
		"sessions",
		r#"
		CREATE TABLE IF NOT EXISTS sessions (
			id TEXT PRIMARY KEY,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			token_hash TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL,
			expires_at TEXT NOT NULL
		)
		"#,
	),
];

/// Create all tables and indexes if they do not exist yet.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, statement) in SCHEMA {
		sqlx::query(statement).execute(pool).await.map_err(|e| {
			tracing::error!(step = %name, error = %e, "migration failed");
			DbError::Sqlx(e)
		})?;
	}

	tracing::info!(steps = SCHEMA.len(), "database schema ready");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let tables: Vec<(String,)> =
			sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
				.fetch_all(&pool)
				.await
				.unwrap();
		let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
		for expected in ["projects", "saved_queries", "sessions", "team_members", "teams", "users"] {
			assert!(names.contains(&expected), "missing table {expected}");
		}
	}

	#[tokio::test]
	async fn team_members_rejects_unknown_role() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();

		let result = sqlx::query(
			"INSERT INTO team_members (team_id, user_id, role, created_at) VALUES ('t', 'u', 'superuser', 'now')",
		)
		.execute(&pool)
		.await;
		assert!(result.is_err());
	}
}
