//! Error types for the fixture engine.
//!
//! Every variant carries the fixture type, load key, or operation name that
//! caused it, so a failing test reports something diagnosable.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while resolving and creating fixtures.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// The requested (or transitively required) fixture type is not registered.
	#[error("Fixture type \"{0}\" does not exist")]
	UnknownFixtureType(String),

	/// A declared reference-data query returned no usable result.
	#[error("Data not found for load \"{key}\": {query}")]
	DataNotFound {
		/// Load key of the failing spec.
		key: String,
		/// Query descriptor that was issued.
		query: Value,
	},

	/// A loaded record does not contain the field a load spec injects.
	#[error("Loaded data \"{key}\" has no field \"{field}\"")]
	LoadedFieldMissing {
		/// Load key of the cached record.
		key: String,
		/// Field that was requested from the record.
		field: String,
	},

	/// A fixture type names a persistence operation that is not registered.
	#[error("Fixture type \"{fixture_type}\" uses unknown operation \"{operation}\"")]
	UnknownOperation {
		/// Fixture type declaring the operation.
		fixture_type: String,
		/// Operation name taken from the type definition.
		operation: String,
	},

	/// The requirement graph loops back onto a type that is still being created.
	#[error("Dependency cycle detected: {}", .0.join(" -> "))]
	DependencyCycle(Vec<String>),

	/// An overwrite block addressed to a requirement is not an object.
	#[error("Overwrites for requirement \"{requirement}\" must be an object, got {value}")]
	InvalidOverwrite {
		/// Requirement the block was addressed to.
		requirement: String,
		/// The offending value.
		value: Value,
	},

	/// The query interface failed while fetching reference data.
	#[error("Query error: {0}")]
	QueryError(String),

	/// A persistence operation failed.
	#[error("Operation \"{operation}\" failed: {message}")]
	OperationFailed {
		/// Operation that was dispatched.
		operation: String,
		/// Failure reported by the backend.
		message: String,
	},

	/// Invalid registry file format detected.
	#[error("Invalid registry format: {0}")]
	InvalidFormat(String),

	/// Error parsing registry data.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML serialization/deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),

	/// Registry file not found.
	#[error("Registry file not found: {0}")]
	FileNotFound(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),
}

impl SeedingError {
	/// Builds an [`SeedingError::OperationFailed`] from any displayable backend error.
	pub fn operation_failed(operation: impl Into<String>, error: impl std::fmt::Display) -> Self {
		Self::OperationFailed {
			operation: operation.into(),
			message: error.to_string(),
		}
	}
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;
