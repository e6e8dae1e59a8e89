//! seed command implementation.
//!
//! This command creates fixture types, and everything they require, through
//! the admin API.

use std::path::{Path, PathBuf};

use colored::Colorize;
use fixture_seeder_admin::SeederSettings;
use fixture_seeder_core::{FixtureRegistry, Overwrites};
use serde_json::Value;

use crate::error::{CommandError, CommandResult};
use crate::session::SeedingSession;

/// Arguments for the seed command.
#[derive(Debug, Clone, Default)]
pub struct SeedArgs {
	/// Fixture types to create, in order.
	pub fixture_types: Vec<String>,

	/// Overwrites applied to every listed type.
	pub overwrites: Overwrites,
}

impl SeedArgs {
	/// Creates arguments for the given types without overwrites.
	pub fn new<I, S>(fixture_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			fixture_types: fixture_types.into_iter().map(Into::into).collect(),
			overwrites: Overwrites::new(),
		}
	}

	/// Sets overwrites.
	pub fn with_overwrites(mut self, overwrites: Overwrites) -> Self {
		self.overwrites = overwrites;
		self
	}
}

/// Parses overwrites given as a JSON object on the command line.
///
/// # Errors
///
/// Returns a validation error if `json` is not a JSON object.
pub fn parse_overwrites(json: &str) -> CommandResult<Overwrites> {
	let value: Value = serde_json::from_str(json)
		.map_err(|e| CommandError::validation("overwrites", e.to_string()))?;
	Overwrites::try_from(value).map_err(|e| CommandError::validation("overwrites", e.to_string()))
}

/// Options for the seed command.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
	/// Settings file; defaults and environment only when absent.
	pub settings_path: Option<PathBuf>,

	/// Restore the initial state before each type after the first.
	pub reset_between: bool,

	/// Verbosity level.
	pub verbosity: u8,
}

impl SeedOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the settings file.
	pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.settings_path = Some(path.into());
		self
	}

	/// Sets the reset-between flag.
	pub fn with_reset_between(mut self, reset: bool) -> Self {
		self.reset_between = reset;
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Outcome of a seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedResult {
	/// Types created during the run, requirements included, in creation order.
	pub created: Vec<String>,
}

/// The seed command.
///
/// # Example
///
/// ```ignore
/// let command = SeedCommand::new();
/// let args = SeedArgs::new(["product"]).with_overwrites(Overwrites::new().with("name", "Trousers"));
/// let options = SeedOptions::new().with_settings_path("seeder.toml");
/// let result = command.execute(args, options).await?;
/// println!("Created {:?}", result.created);
/// ```
#[derive(Debug, Default)]
pub struct SeedCommand;

impl SeedCommand {
	/// Creates a new seed command.
	pub fn new() -> Self {
		Self
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"seed"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Creates the named fixture type(s) and their requirements"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: seed [options] type [type ...]

Creates the named fixture type(s), and every type they require, through the
admin API. Each type is created at most once per run.

Arguments:
  type                 One or more fixture types to create

Options:
  --overwrites JSON    Object of path -> value set on the created payloads
  --config PATH        Settings file (TOML)
  --reset-between      Create requirements again for every listed type
  -v, --verbosity      Verbosity level (repeat for more)
"#
	}

	/// Executes the seed command against a session built from settings.
	///
	/// # Arguments
	///
	/// * `args` - Fixture types and overwrites
	/// * `options` - Command options
	///
	/// # Returns
	///
	/// Returns the types created, in creation order.
	pub async fn execute(&self, args: SeedArgs, options: SeedOptions) -> CommandResult<SeedResult> {
		Self::validate(&args)?;

		let settings = SeederSettings::load(options.settings_path.as_deref())?;
		let mut session = SeedingSession::from_settings(&settings)?;
		self.execute_in(&mut session, args, &options).await
	}

	/// Executes the seed command in an existing session.
	pub async fn execute_in(
		&self,
		session: &mut SeedingSession,
		args: SeedArgs,
		options: &SeedOptions,
	) -> CommandResult<SeedResult> {
		Self::validate(&args)?;

		let mut result = SeedResult::default();
		for (index, fixture_type) in args.fixture_types.iter().enumerate() {
			if options.reset_between && index > 0 {
				session.set_to_initial_state();
			}

			let before = session.manager().created_types().len();
			session
				.create(fixture_type, args.overwrites.clone())
				.await?;

			let created = session.manager().created_types();
			let start = before.min(created.len());
			result.created.extend(created[start..].iter().cloned());
		}

		if options.verbosity > 0 {
			self.print_result(&result);
		}

		Ok(result)
	}

	fn validate(args: &SeedArgs) -> CommandResult<()> {
		if args.fixture_types.is_empty() {
			return Err(CommandError::validation(
				"fixture_types",
				"At least one fixture type must be specified",
			));
		}
		Ok(())
	}

	fn print_result(&self, result: &SeedResult) {
		println!(
			"{} {} fixture type(s)",
			"Created".green().bold(),
			result.created.len()
		);
		for fixture_type in &result.created {
			println!("  - {}", fixture_type);
		}
	}
}

/// Lists the fixture types of a registry with the operation each one uses.
pub fn list_types(registry: &FixtureRegistry) -> Vec<(String, Option<String>)> {
	let mut types: Vec<(String, Option<String>)> = registry
		.definitions()
		.map(|(name, definition)| (name.to_string(), definition.method.clone()))
		.collect();
	types.sort();
	types
}

/// Reads the registry named by the settings at `settings_path`.
pub fn load_registry(settings_path: Option<&Path>) -> CommandResult<FixtureRegistry> {
	let settings = SeederSettings::load(settings_path)?;
	Ok(FixtureRegistry::from_paths(
		&settings.registry.fixtures,
		&settings.registry.fixture_types,
	)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use fixture_seeder_core::FixtureTypeDefinition;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_command_metadata() {
		let cmd = SeedCommand::new();
		assert_eq!(cmd.name(), "seed");
		assert!(!cmd.description().is_empty());
		assert!(cmd.help().contains("--reset-between"));
	}

	#[rstest]
	fn test_options_builder() {
		let options = SeedOptions::new()
			.with_settings_path("seeder.toml")
			.with_reset_between(true)
			.with_verbosity(2);

		assert_eq!(options.settings_path, Some(PathBuf::from("seeder.toml")));
		assert!(options.reset_between);
		assert_eq!(options.verbosity, 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_without_types() {
		let cmd = SeedCommand::new();

		let result = cmd.execute(SeedArgs::default(), SeedOptions::new()).await;

		assert!(matches!(
			result,
			Err(CommandError::Validation { field, .. }) if field == "fixture_types"
		));
	}

	#[rstest]
	fn test_parse_overwrites() {
		let overwrites = parse_overwrites(r#"{"name": "Trousers", "currency": {"isoCode": "XTS"}}"#)
			.unwrap();

		assert_eq!(overwrites.get("name"), Some(&json!("Trousers")));
		assert_eq!(overwrites.len(), 2);
	}

	#[rstest]
	#[case("[1, 2]")]
	#[case("\"name\"")]
	#[case("{not json")]
	fn test_parse_overwrites_rejects_non_object(#[case] input: &str) {
		assert!(matches!(
			parse_overwrites(input),
			Err(CommandError::Validation { field, .. }) if field == "overwrites"
		));
	}

	#[rstest]
	fn test_list_types() {
		let registry = FixtureRegistry::default()
			.with_type(
				"product",
				FixtureTypeDefinition::new().with_method("createProduct"),
				vec![],
			)
			.with_type("marker", FixtureTypeDefinition::new(), vec![]);

		let types = list_types(&registry);

		assert_eq!(
			types,
			vec![
				("marker".to_string(), None),
				("product".to_string(), Some("createProduct".to_string())),
			]
		);
	}
}
