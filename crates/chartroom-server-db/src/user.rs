// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.

use async_trait::async_trait;
use chartroom_server_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{timestamp_column, uuid_column};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO users (id, name, surname, email, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.name)
		.bind(&user.surname)
		.bind(&user.email)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {
				tracing::debug!(user_id = %user.id, "user created");
				Ok(())
			}
			Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DbError::Conflict(
				"a user with this email already exists".to_string(),
			)),
			Err(e) => Err(e.into()),
		}
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, surname, email, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}
}

pub(crate) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	Ok(User {
		id: UserId::new(uuid_column(row, "id")?),
		name: row.get("name"),
		surname: row.get("surname"),
		email: row.get("email"),
		created_at: timestamp_column(row, "created_at")?,
		updated_at: timestamp_column(row, "updated_at")?,
	})
}
