// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control policy configuration.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RbacConfig {
	/// TOML file of `[[grants]]` replacing the built-in grants.
	pub policy_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RbacConfigLayer {
	#[serde(default)]
	pub policy_file: Option<PathBuf>,
}

impl RbacConfigLayer {
	pub fn merge(&mut self, other: RbacConfigLayer) {
		if other.policy_file.is_some() {
			self.policy_file = other.policy_file;
		}
	}

	pub fn finalize(self) -> RbacConfig {
		RbacConfig {
			policy_file: self.policy_file,
		}
	}
}
