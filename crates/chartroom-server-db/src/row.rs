// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.
//!
//! IDs are stored as UUID strings and timestamps as RFC 3339 text.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid, DbError> {
	let value: String = row.get(column);
	Uuid::parse_str(&value).map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, DbError> {
	let value: String = row.get(column);
	DateTime::parse_from_rfc3339(&value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}
