//! Convenience re-exports for common usage.

pub use fixture_seeder_core::prelude::*;

#[cfg(feature = "admin-api")]
pub use fixture_seeder_admin::{
	AdminApiClient, AdminApiError, AdminApiOperation, AdminApiSettings, SearchQuery,
	SeederSettings, ShopVersion, operations_from_settings,
};

#[cfg(feature = "commands")]
pub use fixture_seeder_commands::{
	CommandError, CommandResult, SeedArgs, SeedCommand, SeedOptions, SeedResult, SeedingSession,
};
