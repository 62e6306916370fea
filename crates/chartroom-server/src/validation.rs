// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers and the saved query pipeline.

use chartroom_server_auth::{ProjectId, SavedQueryId};
use uuid::Uuid;

/// Maximum length of a saved query summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 255;

/// Maximum length of a saved query type tag, in characters.
pub const MAX_TYPE_CHARS: usize = 64;

/// Error type for ID parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct IdParseError {
	pub error: String,
	pub message: String,
}

impl IdParseError {
	fn invalid(what: &str, value: &str) -> Self {
		Self {
			error: "invalid_id".to_string(),
			message: format!("'{value}' is not a valid {what} id"),
		}
	}
}

/// Parse a string as a ProjectId.
pub fn parse_project_id(id_str: &str) -> Result<ProjectId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(ProjectId::new)
		.map_err(|_| IdParseError::invalid("project", id_str))
}

/// Parse a string as a SavedQueryId.
pub fn parse_saved_query_id(id_str: &str) -> Result<SavedQueryId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(SavedQueryId::new)
		.map_err(|_| IdParseError::invalid("saved query", id_str))
}

/// Check a summary and return it trimmed.
///
/// Summaries must be non-blank and at most [`MAX_SUMMARY_CHARS`] characters
/// once trimmed.
pub fn validate_summary(summary: &str) -> Result<String, String> {
	let trimmed = summary.trim();
	if trimmed.is_empty() {
		return Err("summary must not be empty".to_string());
	}
	if trimmed.chars().count() > MAX_SUMMARY_CHARS {
		return Err(format!(
			"summary must be at most {MAX_SUMMARY_CHARS} characters"
		));
	}
	Ok(trimmed.to_string())
}

/// Check an optional type tag; absent becomes the empty string.
pub fn validate_query_type(query_type: Option<&str>) -> Result<String, String> {
	let value = query_type.map(str::trim).unwrap_or_default();
	if value.chars().count() > MAX_TYPE_CHARS {
		return Err(format!("type must be at most {MAX_TYPE_CHARS} characters"));
	}
	Ok(value.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn parses_valid_ids() {
		let id = Uuid::new_v4();
		assert_eq!(parse_project_id(&id.to_string()).unwrap().into_inner(), id);
		assert_eq!(parse_saved_query_id(&id.to_string()).unwrap().into_inner(), id);
	}

	#[test]
	fn rejects_invalid_ids() {
		let err = parse_project_id("not-a-uuid").unwrap_err();
		assert_eq!(err.error, "invalid_id");
		assert!(parse_saved_query_id("").is_err());
	}

	#[test]
	fn summary_is_trimmed() {
		assert_eq!(validate_summary("  Weekly revenue ").unwrap(), "Weekly revenue");
	}

	#[test]
	fn blank_summary_is_rejected() {
		assert!(validate_summary("").is_err());
		assert!(validate_summary(" \t\n").is_err());
	}

	#[test]
	fn summary_length_counts_characters() {
		let at_limit = "é".repeat(MAX_SUMMARY_CHARS);
		assert!(validate_summary(&at_limit).is_ok());
		assert!(validate_summary(&format!("{at_limit}é")).is_err());
	}

	#[test]
	fn missing_type_becomes_empty() {
		assert_eq!(validate_query_type(None).unwrap(), "");
		assert_eq!(validate_query_type(Some(" chart ")).unwrap(), "chart");
	}

	proptest! {
		#[test]
		fn non_blank_summaries_within_limit_are_accepted(summary in "[a-zA-Z0-9]{1,255}") {
			prop_assert_eq!(validate_summary(&summary).unwrap(), summary);
		}

		#[test]
		fn long_types_are_rejected(extra in 1usize..100) {
			let value = "x".repeat(MAX_TYPE_CHARS + extra);
			prop_assert!(validate_query_type(Some(&value)).is_err());
		}
	}
}
