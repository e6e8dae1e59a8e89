//! Fixture dependency resolution and creation engine.
//!
//! Seeds a system under test with interdependent reference data before UI or
//! API tests run. Each fixture type is created at most once per session, after
//! its requirements, with caller-supplied overwrites applied to fresh copies of
//! its templates.
//!
//! # Quick Start
//!
//! Describe the fixture types (`fixture-types.json`):
//!
//! ```json
//! {
//!   "currency": { "method": "createCurrency" },
//!   "product": {
//!     "requirements": ["currency"],
//!     "load": [
//!       { "key": "tax", "query": { "endpoint": "tax", "data": { "field": "name", "value": "Standard rate" } },
//!         "into": "taxId", "requiredField": "id" }
//!     ],
//!     "method": "createProduct"
//!   }
//! }
//! ```
//!
//! and their templates (`fixtures.json`):
//!
//! ```json
//! {
//!   "currency": [{ "isoCode": "XTS", "name": "Test currency" }],
//!   "product": [{ "name": "Shirt", "productNumber": "SW-1" }]
//! }
//! ```
//!
//! Then create what a test needs:
//!
//! ```ignore
//! use fixture_seeder_core::prelude::*;
//!
//! let registry = FixtureRegistry::from_paths(Path::new("fixtures.json"), Path::new("fixture-types.json"))?;
//! let mut manager = FixtureManager::new(Arc::new(registry), &operations, query)?;
//!
//! manager
//!     .create_fixture("product", Overwrites::new().with("name", "Trousers"))
//!     .await?;
//!
//! // Between tests
//! manager.reset();
//! ```
//!
//! # Architecture
//!
//! - [`FixtureRegistry`](registry::FixtureRegistry) - Read-only templates and type definitions
//! - [`Overwrites`](overwrite::Overwrites) - Path-keyed overrides and the path setter
//! - [`DataLoader`](loader::DataLoader) - Memoized reference data behind a [`QueryInterface`](loader::QueryInterface)
//! - [`OperationRegistry`](operation::OperationRegistry) - Named persistence operations
//! - [`FixtureManager`](manager::FixtureManager) - Orchestrates all of the above
//!
//! # Features
//!
//! - `json` - JSON registry files (enabled by default)
//! - `yaml` - YAML registry files
//! - `full` - All features enabled

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod loader;
pub mod manager;
pub mod operation;
pub mod overwrite;
pub mod prelude;
pub mod registry;

// Re-export commonly used types at crate root
pub use error::{SeedingError, SeedingResult};
pub use loader::{DataLoader, QueryInterface};
pub use manager::FixtureManager;
pub use operation::{FixtureOperation, OperationRegistry};
pub use overwrite::Overwrites;
pub use registry::{FixtureRegistry, FixtureTypeDefinition, LoadSpec};
