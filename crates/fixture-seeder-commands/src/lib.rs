//! Seeding commands for the fixture seeder.
//!
//! - [`SeedingSession`] - One fixture manager wired to the admin API
//! - [`SeedCommand`] - Creates fixture types from the command line
//!
//! The `fixture-seeder` binary exposes both:
//!
//! ```bash
//! fixture-seeder --config seeder.toml seed product customer --overwrites '{"name": "Trousers"}'
//! fixture-seeder --config seeder.toml types
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod seed;
pub mod session;

pub use error::{CommandError, CommandResult};
pub use seed::{SeedArgs, SeedCommand, SeedOptions, SeedResult, list_types, load_registry, parse_overwrites};
pub use session::SeedingSession;
