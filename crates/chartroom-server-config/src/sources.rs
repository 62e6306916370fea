// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer,
	RbacConfigLayer,
};

/// Default location of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/chartroom/server.toml";

/// Prefix shared by every environment variable this crate reads.
pub const ENV_PREFIX: &str = "CHARTROOM_SERVER_";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source. Defaults are applied by `finalize`, so this
/// layer is empty.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: CHARTROOM_SERVER_<SECTION>_<FIELD>, e.g.
/// `CHARTROOM_SERVER_HTTP_PORT`. Empty values are treated as unset.
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup.
	pub fn load_from<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let env = EnvReader { lookup };
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: env.string("HTTP_HOST"),
				port: env.parsed("HTTP_PORT")?,
			}),
			database: Some(DatabaseConfigLayer {
				url: env.string("DATABASE_URL"),
			}),
			logging: Some(LoggingConfigLayer {
				level: env.string("LOGGING_LEVEL"),
				format: env.parsed::<LogFormat>("LOGGING_FORMAT")?,
			}),
			auth: Some(AuthConfigLayer {
				environment: env.string("AUTH_ENVIRONMENT"),
			}),
			rbac: Some(RbacConfigLayer {
				policy_file: env.string("RBAC_POLICY_FILE").map(PathBuf::from),
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_from(|name| std::env::var(name).ok())
	}
}

struct EnvReader<F> {
	lookup: F,
}

impl<F> EnvReader<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn string(&self, field: &str) -> Option<String> {
		(self.lookup)(&format!("{ENV_PREFIX}{field}")).filter(|s| !s.is_empty())
	}

	fn parsed<T>(&self, field: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		match self.string(field) {
			Some(v) => v.parse().map(Some).map_err(|e| ConfigError::InvalidValue {
				key: format!("{ENV_PREFIX}{field}"),
				message: format!("'{v}': {e}"),
			}),
			None => Ok(None),
		}
	}
}
