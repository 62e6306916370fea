// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer sessions.
//!
//! Clients hold an opaque random token; the server only ever stores its
//! SHA-256 hash. Token values must never be logged.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{SessionId, UserId};

/// Number of random bytes in a session token (hex-encoded to twice as many chars).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// A server-side session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Creates a session for `user_id` that expires after `ttl`.
	pub fn new(user_id: UserId, ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::generate(),
			user_id,
			created_at: now,
			expires_at: now + ttl,
		}
	}

	/// Returns true if the session has expired at `now`.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now >= self.expires_at
	}
}

/// Generates a new random session token.
pub fn generate_session_token() -> String {
	let mut bytes = [0u8; SESSION_TOKEN_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}

/// Hashes a token for storage and lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
