//! Registry file parsing.
//!
//! A registry is read from two files: one mapping each fixture type to its
//! payload templates, one mapping each fixture type to its definition.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::{FixtureFormat, FixtureRegistry, FixtureTypeDefinition};
use crate::error::{SeedingError, SeedingResult};

/// Parser for registry files.
///
/// Supports both JSON and YAML formats (YAML requires the `yaml` feature).
#[derive(Debug, Default)]
pub struct RegistryParser;

impl RegistryParser {
	/// Creates a new registry parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses both registry files into a [`FixtureRegistry`].
	///
	/// # Arguments
	///
	/// * `fixtures_path` - File mapping fixture types to payload templates
	/// * `fixture_types_path` - File mapping fixture types to definitions
	///
	/// # Errors
	///
	/// Returns an error if either file cannot be read, has an unrecognized
	/// extension, or does not have the expected shape.
	pub fn parse_files(
		&self,
		fixtures_path: &Path,
		fixture_types_path: &Path,
	) -> SeedingResult<FixtureRegistry> {
		let fixtures = self.parse_fixtures_file(fixtures_path)?;
		let fixture_types = self.parse_fixture_types_file(fixture_types_path)?;
		Ok(FixtureRegistry::new(fixtures, fixture_types))
	}

	/// Parses a templates file.
	pub fn parse_fixtures_file(&self, path: &Path) -> SeedingResult<HashMap<String, Vec<Value>>> {
		let (content, format) = self.read(path)?;
		self.parse_fixtures(&content, format)
	}

	/// Parses a fixture-types file.
	pub fn parse_fixture_types_file(
		&self,
		path: &Path,
	) -> SeedingResult<HashMap<String, FixtureTypeDefinition>> {
		let (content, format) = self.read(path)?;
		self.parse_fixture_types(&content, format)
	}

	/// Parses templates from a string.
	///
	/// Each entry may be a single template object or an array of templates.
	pub fn parse_fixtures(
		&self,
		content: &str,
		format: FixtureFormat,
	) -> SeedingResult<HashMap<String, Vec<Value>>> {
		let entries = self.parse_object(content, format)?;

		let mut fixtures = HashMap::with_capacity(entries.len());
		for (fixture_type, entry) in entries {
			let templates = match entry {
				Value::Array(templates) => templates,
				template @ Value::Object(_) => vec![template],
				other => {
					return Err(SeedingError::ParseError(format!(
						"Templates for fixture type \"{}\" must be an object or array, got {}",
						fixture_type, other
					)));
				}
			};
			fixtures.insert(fixture_type, templates);
		}
		Ok(fixtures)
	}

	/// Parses fixture-type definitions from a string.
	pub fn parse_fixture_types(
		&self,
		content: &str,
		format: FixtureFormat,
	) -> SeedingResult<HashMap<String, FixtureTypeDefinition>> {
		let entries = self.parse_object(content, format)?;

		let mut fixture_types = HashMap::with_capacity(entries.len());
		for (fixture_type, entry) in entries {
			let definition: FixtureTypeDefinition = serde_json::from_value(entry).map_err(|e| {
				SeedingError::ParseError(format!(
					"Invalid definition for fixture type \"{}\": {}",
					fixture_type, e
				))
			})?;
			fixture_types.insert(fixture_type, definition);
		}
		Ok(fixture_types)
	}

	fn read(&self, path: &Path) -> SeedingResult<(String, FixtureFormat)> {
		let format = FixtureFormat::from_path(path).ok_or_else(|| {
			SeedingError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				SeedingError::FileNotFound(path.display().to_string())
			} else {
				SeedingError::IoError(e)
			}
		})?;

		Ok((content, format))
	}

	fn parse_object(
		&self,
		content: &str,
		format: FixtureFormat,
	) -> SeedingResult<serde_json::Map<String, Value>> {
		let value = match format {
			FixtureFormat::Json => serde_json::from_str::<Value>(content)?,
			FixtureFormat::Yaml => self.parse_yaml(content)?,
		};

		match value {
			Value::Object(entries) => Ok(entries),
			_ => Err(SeedingError::InvalidFormat(format!(
				"Expected a {} object keyed by fixture type",
				format
			))),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> SeedingResult<Value> {
		Ok(serde_yaml::from_str::<Value>(content)?)
	}

	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> SeedingResult<Value> {
		Err(SeedingError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}
}
