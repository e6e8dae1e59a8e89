//! Admin API collaborators for the fixture seeder.
//!
//! Provides the [`QueryInterface`](fixture_seeder_core::QueryInterface) and
//! [`FixtureOperation`](fixture_seeder_core::FixtureOperation) implementations
//! that talk to a shop's admin API, and the settings they are built from.
//!
//! ```ignore
//! use fixture_seeder_admin::{AdminApiClient, SeederSettings, operations_from_settings};
//!
//! let settings = SeederSettings::load(Some(Path::new("seeder.toml")))?;
//! let client = Arc::new(AdminApiClient::new(&settings.admin_api)?);
//! let operations = operations_from_settings(&settings.operations, Arc::clone(&client));
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod operation;
pub mod settings;
pub mod version;

pub use client::{AdminApiClient, SearchCriteria, SearchQuery};
pub use error::{AdminApiError, AdminApiResult};
pub use operation::{AdminApiOperation, operations_from_settings};
pub use settings::{AdminApiSettings, RegistrySettings, SeederSettings};
pub use version::ShopVersion;
