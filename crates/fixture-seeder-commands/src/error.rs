//! Error types for seeding commands.

use fixture_seeder_admin::AdminApiError;
use fixture_seeder_core::SeedingError;
use thiserror::Error;

/// Errors raised by seeding commands
#[derive(Debug, Error)]
pub enum CommandError {
	/// A command argument is missing or malformed
	#[error("Invalid {field}: {message}")]
	Validation {
		/// Offending argument
		field: String,
		/// What is wrong with it
		message: String,
	},

	/// Fixture creation failed
	#[error(transparent)]
	Seeding(#[from] SeedingError),

	/// Settings or admin API failure outside of fixture creation
	#[error(transparent)]
	AdminApi(#[from] AdminApiError),
}

impl CommandError {
	/// Creates a validation error.
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Result type for seeding commands
pub type CommandResult<T> = Result<T, CommandError>;
