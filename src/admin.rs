//! Admin API module.
//!
//! Query interface, persistence operations and settings for seeding through a
//! shop's admin API.
//!
//! # Examples
//!
//! ```rust,ignore
//! use fixture_seeder::admin::{AdminApiClient, AdminApiSettings};
//! ```

pub use fixture_seeder_admin::*;
