//! Fixture registry.
//!
//! The registry is the read-only description of every fixture type: its
//! payload templates and its [`FixtureTypeDefinition`]. It is built once per
//! session and shared behind an `Arc`; templates are never mutated in place.

mod format;
mod parser;

pub use format::{FixtureFormat, FixtureTypeDefinition, LoadSpec};
pub use parser::RegistryParser;

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{SeedingError, SeedingResult};

/// Read-only mapping of fixture types to templates and definitions.
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
	fixtures: HashMap<String, Vec<Value>>,
	fixture_types: HashMap<String, FixtureTypeDefinition>,
}

impl FixtureRegistry {
	/// Creates a registry from the two maps.
	pub fn new(
		fixtures: HashMap<String, Vec<Value>>,
		fixture_types: HashMap<String, FixtureTypeDefinition>,
	) -> Self {
		for fixture_type in fixtures.keys() {
			if !fixture_types.contains_key(fixture_type) {
				tracing::warn!(
					fixture_type = %fixture_type,
					"templates registered for a fixture type without a definition"
				);
			}
		}

		Self {
			fixtures,
			fixture_types,
		}
	}

	/// Loads a registry from a templates file and a fixture-types file.
	pub fn from_paths(fixtures_path: &Path, fixture_types_path: &Path) -> SeedingResult<Self> {
		RegistryParser::new().parse_files(fixtures_path, fixture_types_path)
	}

	/// Adds a fixture type with its templates.
	pub fn with_type(
		mut self,
		fixture_type: impl Into<String>,
		definition: FixtureTypeDefinition,
		templates: Vec<Value>,
	) -> Self {
		let fixture_type = fixture_type.into();
		self.fixtures.insert(fixture_type.clone(), templates);
		self.fixture_types.insert(fixture_type, definition);
		self
	}

	/// Returns the definition of a fixture type.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnknownFixtureType`] if the type is not registered.
	pub fn fixture_type(&self, fixture_type: &str) -> SeedingResult<&FixtureTypeDefinition> {
		self.fixture_types
			.get(fixture_type)
			.ok_or_else(|| SeedingError::UnknownFixtureType(fixture_type.to_string()))
	}

	/// Returns the templates of a fixture type, empty if it has none.
	pub fn templates(&self, fixture_type: &str) -> &[Value] {
		self.fixtures
			.get(fixture_type)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Returns true if a definition exists for the fixture type.
	pub fn contains(&self, fixture_type: &str) -> bool {
		self.fixture_types.contains_key(fixture_type)
	}

	/// Returns all defined fixture types, sorted by name.
	pub fn type_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.fixture_types.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Iterates over all definitions.
	pub fn definitions(&self) -> impl Iterator<Item = (&str, &FixtureTypeDefinition)> {
		self.fixture_types
			.iter()
			.map(|(name, definition)| (name.as_str(), definition))
	}

	/// Returns the number of defined fixture types.
	pub fn len(&self) -> usize {
		self.fixture_types.len()
	}

	/// Returns true if no fixture types are defined.
	pub fn is_empty(&self) -> bool {
		self.fixture_types.is_empty()
	}
}
