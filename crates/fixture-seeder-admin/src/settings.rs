//! Seeder settings.
//!
//! Settings come from a TOML file:
//!
//! ```toml
//! [admin_api]
//! url = "http://localhost:8000"
//! username = "admin"
//! password = "shopware"
//!
//! [registry]
//! fixtures = "fixtures.json"
//! fixture_types = "fixture-types.json"
//!
//! [operations]
//! createCurrency = "currency"
//! createProduct = "product"
//! ```
//!
//! and are then overridden from the environment (`SEEDER_ADMIN_URL`,
//! `SEEDER_ADMIN_USERNAME`, `SEEDER_ADMIN_PASSWORD`). `SHOPWARE_VERSION` only
//! applies when the file does not pin `admin_api.shop_version`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdminApiError, AdminApiResult};
use crate::version::{ShopVersion, api_path_for};

/// Environment variable overriding [`AdminApiSettings::url`]
pub const ENV_ADMIN_URL: &str = "SEEDER_ADMIN_URL";
/// Environment variable overriding [`AdminApiSettings::username`]
pub const ENV_ADMIN_USERNAME: &str = "SEEDER_ADMIN_USERNAME";
/// Environment variable overriding [`AdminApiSettings::password`]
pub const ENV_ADMIN_PASSWORD: &str = "SEEDER_ADMIN_PASSWORD";
/// Environment variable naming the shop version
pub const ENV_SHOP_VERSION: &str = "SHOPWARE_VERSION";

/// All seeder settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeederSettings {
	/// Admin API connection
	pub admin_api: AdminApiSettings,
	/// Registry file locations
	pub registry: RegistrySettings,
	/// Operation name to API endpoint
	pub operations: BTreeMap<String, String>,
}

/// Admin API connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminApiSettings {
	/// Base URL of the shop, without API path
	pub url: String,
	/// Admin user name for the password grant
	pub username: String,
	/// Admin password for the password grant
	pub password: String,
	/// OAuth client id
	pub client_id: String,
	/// Pinned shop version; derived from `url` when absent
	pub shop_version: Option<String>,
	/// Request timeout in seconds
	pub timeout_secs: u64,
}

impl Default for AdminApiSettings {
	fn default() -> Self {
		Self {
			url: "http://localhost:8000".to_string(),
			username: "admin".to_string(),
			password: "shopware".to_string(),
			client_id: "administration".to_string(),
			shop_version: None,
			timeout_secs: 30,
		}
	}
}

impl AdminApiSettings {
	/// Returns the API path prefix of the configured shop.
	///
	/// # Errors
	///
	/// Returns [`AdminApiError::InvalidVersion`] if `shop_version` is set but invalid.
	pub fn api_path(&self) -> AdminApiResult<&'static str> {
		let version = ShopVersion::resolve(self.shop_version.as_deref(), &self.url)?;
		Ok(api_path_for(version.as_ref()))
	}

	/// Returns the request timeout.
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl fmt::Debug for AdminApiSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdminApiSettings")
			.field("url", &self.url)
			.field("username", &self.username)
			.field("password", &"***")
			.field("client_id", &self.client_id)
			.field("shop_version", &self.shop_version)
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

/// Registry file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
	/// Templates file
	pub fixtures: PathBuf,
	/// Fixture type definitions file
	pub fixture_types: PathBuf,
}

impl Default for RegistrySettings {
	fn default() -> Self {
		Self {
			fixtures: PathBuf::from("fixtures.json"),
			fixture_types: PathBuf::from("fixture-types.json"),
		}
	}
}

impl SeederSettings {
	/// Parses settings from TOML content.
	pub fn from_toml_str(content: &str) -> AdminApiResult<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Reads settings from a TOML file.
	///
	/// Relative registry paths are resolved against the file's directory.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is not valid TOML.
	pub fn from_file(path: &Path) -> AdminApiResult<Self> {
		let content = fs::read_to_string(path)?;
		let mut settings = Self::from_toml_str(&content)?;

		if let Some(base) = path.parent() {
			settings.registry.fixtures = resolve_relative(base, &settings.registry.fixtures);
			settings.registry.fixture_types =
				resolve_relative(base, &settings.registry.fixture_types);
		}

		tracing::debug!(path = %path.display(), "loaded seeder settings");
		Ok(settings)
	}

	/// Loads settings from an optional file, then applies the process environment.
	pub fn load(path: Option<&Path>) -> AdminApiResult<Self> {
		let settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
	}

	/// Applies environment overrides using `lookup` to read variables.
	pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup(ENV_ADMIN_URL) {
			self.admin_api.url = url;
		}
		if let Some(username) = lookup(ENV_ADMIN_USERNAME) {
			self.admin_api.username = username;
		}
		if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
			self.admin_api.password = password;
		}
		if self.admin_api.shop_version.is_none() {
			self.admin_api.shop_version = lookup(ENV_SHOP_VERSION);
		}
		self
	}

	/// Checks that the settings can drive a seeding session.
	pub fn validate(&self) -> AdminApiResult<()> {
		if self.admin_api.url.trim().is_empty() {
			return Err(AdminApiError::Config("admin_api.url is empty".to_string()));
		}
		if let Some((name, _)) = self
			.operations
			.iter()
			.find(|(_, endpoint)| endpoint.trim().is_empty())
		{
			return Err(AdminApiError::Config(format!(
				"operation \"{}\" has no endpoint",
				name
			)));
		}
		self.admin_api.api_path()?;
		Ok(())
	}
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		base.join(path)
	}
}
