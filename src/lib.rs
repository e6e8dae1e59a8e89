//! # Fixture Seeder
//!
//! Seeds a shop under test with interdependent reference data before UI or
//! API tests run.
//!
//! Fixture types declare what they require, which existing records they
//! reference, and which operation persists their payloads. The seeder creates
//! each type at most once per session, after everything it depends on, with
//! caller-supplied overwrites applied to fresh copies of its templates.
//!
//! ## Feature Flags
//!
//! - `admin-api` (default) - Admin API query interface and operations
//! - `commands` (default) - Seed command and seeding session
//! - `yaml` - YAML registry files
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fixture_seeder::prelude::*;
//!
//! let settings = SeederSettings::load(Some(Path::new("seeder.toml")))?;
//! let mut session = SeedingSession::from_settings(&settings)?;
//!
//! session
//!     .create("product", Overwrites::new().with("name", "Trousers"))
//!     .await?;
//!
//! // After the shop is restored
//! session.set_to_initial_state();
//! ```

#[cfg(feature = "admin-api")]
pub mod admin;
#[cfg(feature = "commands")]
pub mod commands;
pub mod prelude;

// Re-export the engine
pub use fixture_seeder_core::{
	DataLoader, FixtureManager, FixtureOperation, FixtureRegistry, FixtureTypeDefinition,
	LoadSpec, OperationRegistry, Overwrites, QueryInterface, SeedingError, SeedingResult, error,
	loader, manager, operation, overwrite, registry,
};

// Re-export admin API collaborators
#[cfg(feature = "admin-api")]
pub use fixture_seeder_admin::{AdminApiClient, AdminApiError, SearchQuery, SeederSettings};

// Re-export commands
#[cfg(feature = "commands")]
pub use fixture_seeder_commands::{SeedCommand, SeedingSession};
