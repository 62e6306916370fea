// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this user.
	pub id: UserId,

	/// Given name, shown as "created by NAME SURNAME" next to saved queries.
	pub name: String,

	/// Family name.
	pub surname: Option<String>,

	/// Primary email address.
	pub email: String,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Creates a new user with a generated ID.
	pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			name: name.into(),
			surname: None,
			email: email.into(),
			created_at: now,
			updated_at: now,
		}
	}

	/// Builder: set surname.
	pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
		self.surname = Some(surname.into());
		self
	}

	/// Full display name ("Ada Lovelace", or just "Ada" without a surname).
	pub fn display_name(&self) -> String {
		match &self.surname {
			Some(surname) if !surname.is_empty() => format!("{} {}", self.name, surname),
			_ => self.name.clone(),
		}
	}
}
