// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Returns true for errors caused by a missing row.
	pub fn is_not_found(&self) -> bool {
		matches!(self, DbError::NotFound(_))
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
