//! Registry data definitions.
//!
//! This module defines the shapes read from the two registry files: the
//! fixture-type metadata and the formats those files may be written in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Metadata describing how one fixture type is built.
///
/// # Example
///
/// ```json
/// {
///   "requirements": ["currency"],
///   "load": [
///     { "key": "tax", "query": { "endpoint": "tax", "data": { "field": "name", "value": "Standard rate" } },
///       "into": "taxId", "requiredField": "id" }
///   ],
///   "method": "createProduct"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTypeDefinition {
	/// Types that must exist before this one, created in this order.
	#[serde(default)]
	pub requirements: Vec<String>,

	/// Reference data fetched before the payloads are built.
	#[serde(default)]
	pub load: Vec<LoadSpec>,

	/// Persistence operation the payloads are dispatched to.
	///
	/// Types without a method only take part in ordering and data loading.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
}

impl FixtureTypeDefinition {
	/// Creates an empty definition with no requirements, loads or method.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a requirement.
	pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
		self.requirements.push(requirement.into());
		self
	}

	/// Adds a load spec.
	pub fn with_load(mut self, load: LoadSpec) -> Self {
		self.load.push(load);
		self
	}

	/// Sets the persistence operation.
	pub fn with_method(mut self, method: impl Into<String>) -> Self {
		self.method = Some(method.into());
		self
	}
}

/// A piece of shared reference data and where to inject it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadSpec {
	/// Cache key. Specs sharing a key share one fetch per session.
	pub key: String,

	/// Opaque query descriptor handed to the query interface.
	#[serde(alias = "apiData")]
	pub query: Value,

	/// Dotted path in the payload receiving the value.
	pub into: String,

	/// Field of the fetched record that is injected.
	pub required_field: String,
}

impl LoadSpec {
	/// Creates a load spec.
	pub fn new(
		key: impl Into<String>,
		query: Value,
		into: impl Into<String>,
		required_field: impl Into<String>,
	) -> Self {
		Self {
			key: key.into(),
			query,
			into: into.into(),
			required_field: required_field.into(),
		}
	}
}

/// Supported registry file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FixtureFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl FixtureFormat {
	/// Determines the format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use fixture_seeder_core::registry::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_extension("json"), Some(FixtureFormat::Json));
	/// assert_eq!(FixtureFormat::from_extension("yml"), Some(FixtureFormat::Yaml));
	/// assert_eq!(FixtureFormat::from_extension("js"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl std::fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}
