//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use fixture_seeder_core::prelude::*;
//! ```

// Error types
pub use crate::error::{SeedingError, SeedingResult};

// Registry types
pub use crate::registry::{
	FixtureFormat, FixtureRegistry, FixtureTypeDefinition, LoadSpec, RegistryParser,
};

// Engine types
pub use crate::loader::{DataLoader, QueryInterface};
pub use crate::manager::FixtureManager;
pub use crate::operation::{FixtureOperation, OperationRegistry};
pub use crate::overwrite::{FieldPath, Overwrites, get_path, set_path};
