// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information for chartroom-server.

/// Package version of the running binary.
pub fn current() -> &'static str {
	env!("CARGO_PKG_VERSION")
}

/// Git revision baked in at build time, if the build set `CHARTROOM_GIT_SHA`.
pub fn git_sha() -> &'static str {
	option_env!("CHARTROOM_GIT_SHA").unwrap_or("unknown")
}

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"chartroom-server version: {}\n\
         Git SHA:                  {}\n\
         Platform:                 {}-{}",
		current(),
		git_sha(),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_info_names_the_package_version() {
		let info = format_version_info();
		assert!(info.starts_with("chartroom-server version: "));
		assert!(info.contains(current()));
	}
}
