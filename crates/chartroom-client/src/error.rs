// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the saved query client.

use thiserror::Error;

/// Errors returned by [`SavedQueryApi`](crate::SavedQueryApi) implementations.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The server answered 401: no session, or the role lacks the grant.
	#[error("not authorized")]
	Unauthorized,

	/// Any other non-2xx answer.
	#[error("request failed with status {status}: {message}")]
	Status {
		status: u16,
		error: String,
		message: String,
	},

	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("invalid client configuration: {0}")]
	Config(String),

	/// An id that cannot name a single path segment.
	#[error("invalid id: {0:?}")]
	InvalidId(String),
}

impl ClientError {
	/// Short text suitable for showing next to a failed action.
	pub fn user_message(&self) -> String {
		match self {
			ClientError::Unauthorized => "You are not allowed to do that".to_string(),
			ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
			ClientError::Status { status, .. } => format!("Request failed ({status})"),
			ClientError::Transport(_) => "Could not reach the server".to_string(),
			ClientError::Decode(_) => "Unexpected response from the server".to_string(),
			ClientError::Config(message) => message.clone(),
			ClientError::InvalidId(_) => "Unknown saved query".to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, ClientError>;
