//! Commands module.
//!
//! The seed command and the session it runs in.

pub use fixture_seeder_commands::*;
