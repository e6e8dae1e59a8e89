//! Error types for the admin API layer

use fixture_seeder_core::SeedingError;
use thiserror::Error;

/// Errors raised while talking to the admin API or reading its settings
#[derive(Debug, Error)]
pub enum AdminApiError {
	/// The request never produced a response
	#[error("Request to {url} failed: {message}")]
	Transport {
		/// Requested URL
		url: String,
		/// Transport error description
		message: String,
	},

	/// The API answered with a non-success status
	#[error("Admin API request to {url} failed with status {status}: {body}")]
	Status {
		/// Requested URL
		url: String,
		/// HTTP status code
		status: u16,
		/// Response body, as returned by the API
		body: String,
	},

	/// The token endpoint rejected the credentials
	#[error("Authentication failed: {0}")]
	Authentication(String),

	/// A load query does not have the `{endpoint, data: {field, value}}` shape
	#[error("Invalid search query: {0}")]
	InvalidQuery(String),

	/// No record matches a lookup by name
	#[error("No {endpoint} record with {field} {value}")]
	NotFound {
		/// Entity endpoint
		endpoint: String,
		/// Field searched
		field: String,
		/// Value searched for
		value: String,
	},

	/// The response body could not be parsed
	#[error("Failed to parse response: {0}")]
	InvalidResponse(String),

	/// A shop version string is not dotted numeric
	#[error("Invalid shop version \"{0}\"")]
	InvalidVersion(String),

	/// Settings are incomplete or inconsistent
	#[error("Configuration error: {0}")]
	Config(String),

	/// Settings file could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Settings file is not valid TOML
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type for admin API operations
pub type AdminApiResult<T> = Result<T, AdminApiError>;

impl From<AdminApiError> for SeedingError {
	fn from(error: AdminApiError) -> Self {
		SeedingError::QueryError(error.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_status_error_includes_body() {
		let error = AdminApiError::Status {
			url: "http://shop/api/currency".to_string(),
			status: 400,
			body: r#"{"errors":[{"code":"CONTENT__DUPLICATE"}]}"#.to_string(),
		};

		let message = error.to_string();
		assert!(message.contains("400"));
		assert!(message.contains("CONTENT__DUPLICATE"));
	}

	#[rstest]
	fn test_converts_into_query_error() {
		let error: SeedingError = AdminApiError::InvalidQuery("missing endpoint".to_string()).into();

		match error {
			SeedingError::QueryError(message) => assert!(message.contains("missing endpoint")),
			other => panic!("Expected QueryError, got {:?}", other),
		}
	}
}
