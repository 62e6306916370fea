// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository.
//!
//! Only token hashes are persisted. Lookups never return expired sessions.

use async_trait::async_trait;
use chartroom_server_auth::{session::Session, SessionId, User};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;

use crate::error::DbError;
use crate::row::{timestamp_column, uuid_column};
use crate::user::row_to_user;

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError>;
	async fn get_session_user_by_token_hash(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, User)>, DbError>;
	async fn delete_session(&self, id: &SessionId) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, session, token_hash), fields(session_id = %session.id, user_id = %session.user_id))]
	pub async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, "session created");
		Ok(())
	}

	/// Resolve a token hash to its live session and user.
	///
	/// # Returns
	/// `None` if the hash is unknown or the session expired at `now`.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_session_user_by_token_hash(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, User)>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT s.id AS session_id, s.created_at AS session_created_at, s.expires_at,
			       u.id, u.name, u.surname, u.email, u.created_at, u.updated_at
			FROM sessions s
			JOIN users u ON u.id = s.user_id
			WHERE s.token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let user = row_to_user(&row)?;
		let session = Session {
			id: SessionId::new(uuid_column(&row, "session_id")?),
			user_id: user.id,
			created_at: timestamp_column(&row, "session_created_at")?,
			expires_at: timestamp_column(&row, "expires_at")?,
		};

		if session.is_expired_at(now) {
			tracing::debug!(session_id = %session.id, "session expired");
			return Ok(None);
		}

		Ok(Some((session, user)))
	}

	#[tracing::instrument(skip(self), fields(session_id = %id))]
	pub async fn delete_session(&self, id: &SessionId) -> Result<(), DbError> {
		sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(())
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		self.create_session(session, token_hash).await
	}

	async fn get_session_user_by_token_hash(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<(Session, User)>, DbError> {
		self.get_session_user_by_token_hash(token_hash, now).await
	}

	async fn delete_session(&self, id: &SessionId) -> Result<(), DbError> {
		self.delete_session(id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_migrated_test_pool;
	use crate::user::UserRepository;
	use chartroom_server_auth::session::hash_token;
	use chrono::Duration;

	async fn setup() -> (SessionRepository, User) {
		let pool = create_migrated_test_pool().await;
		let user = User::new("Ada", "ada@example.com");
		UserRepository::new(pool.clone())
			.create_user(&user)
			.await
			.unwrap();
		(SessionRepository::new(pool), user)
	}

	#[tokio::test]
	async fn live_session_resolves_user() {
		let (repo, user) = setup().await;
		let session = Session::new(user.id, Duration::hours(1));
		repo
			.create_session(&session, &hash_token("secret"))
			.await
			.unwrap();

		let (found_session, found_user) = repo
			.get_session_user_by_token_hash(&hash_token("secret"), Utc::now())
			.await
			.unwrap()
			.unwrap();
		assert_eq!(found_session.id, session.id);
		assert_eq!(found_user.id, user.id);
	}

	#[tokio::test]
	async fn unknown_hash_is_none() {
		let (repo, _) = setup().await;
		assert!(repo
			.get_session_user_by_token_hash(&hash_token("nope"), Utc::now())
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn expired_session_is_none() {
		let (repo, user) = setup().await;
		let session = Session::new(user.id, Duration::hours(1));
		repo
			.create_session(&session, &hash_token("secret"))
			.await
			.unwrap();

		let later = session.expires_at + Duration::seconds(1);
		assert!(repo
			.get_session_user_by_token_hash(&hash_token("secret"), later)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn deleted_session_no_longer_resolves() {
		let (repo, user) = setup().await;
		let session = Session::new(user.id, Duration::hours(1));
		repo
			.create_session(&session, &hash_token("secret"))
			.await
			.unwrap();

		repo.delete_session(&session.id).await.unwrap();
		assert!(repo
			.get_session_user_by_token_hash(&hash_token("secret"), Utc::now())
			.await
			.unwrap()
			.is_none());
	}
}
