//! Fixture seeder CLI
//!
//! ## Usage
//!
//! ```bash
//! fixture-seeder seed product --overwrites '{"name": "Trousers"}'
//! fixture-seeder types
//! fixture-seeder system-config core.listing.showSoldOutProducts true
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use fixture_seeder_admin::{AdminApiClient, SeederSettings};
use fixture_seeder_commands::{
	CommandResult, SeedArgs, SeedCommand, SeedOptions, list_types, load_registry,
	parse_overwrites,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fixture-seeder")]
#[command(about = "Seeds a shop with interdependent test fixtures", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file (TOML)
	#[arg(short, long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Create fixture types and their requirements
	Seed {
		/// Fixture types to create, in order
		#[arg(value_name = "TYPES", required = true)]
		types: Vec<String>,

		/// JSON object of path -> value applied to every listed type
		#[arg(long, value_name = "JSON")]
		overwrites: Option<String>,

		/// Create requirements again for every listed type
		#[arg(long)]
		reset_between: bool,
	},

	/// List the fixture types of the registry
	Types,

	/// Set a global system configuration value
	SystemConfig {
		/// Configuration key, e.g. core.listing.showSoldOutProducts
		#[arg(value_name = "KEY")]
		key: String,

		/// Value, parsed as JSON when possible
		#[arg(value_name = "VALUE")]
		value: String,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	let result = match cli.command {
		Commands::Seed {
			types,
			overwrites,
			reset_between,
		} => run_seed(types, overwrites, reset_between, cli.config, cli.verbosity).await,
		Commands::Types => run_types(cli.config),
		Commands::SystemConfig { key, value } => run_system_config(&key, &value, cli.config).await,
	};

	if let Err(e) = result {
		eprintln!("{} {}", "Error:".red().bold(), e);
		process::exit(1);
	}
}

fn init_tracing(verbosity: u8) {
	let default_level = match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.init();
}

async fn run_seed(
	types: Vec<String>,
	overwrites: Option<String>,
	reset_between: bool,
	config: Option<PathBuf>,
	verbosity: u8,
) -> CommandResult<()> {
	let overwrites = match overwrites {
		Some(json) => parse_overwrites(&json)?,
		None => Default::default(),
	};
	let args = SeedArgs::new(types).with_overwrites(overwrites);
	let mut options = SeedOptions::new()
		.with_reset_between(reset_between)
		// The summary is always printed by the CLI
		.with_verbosity(verbosity.max(1));
	options.settings_path = config;

	SeedCommand::new().execute(args, options).await?;
	Ok(())
}

fn run_types(config: Option<PathBuf>) -> CommandResult<()> {
	let registry = load_registry(config.as_deref())?;
	for (name, method) in list_types(&registry) {
		match method {
			Some(method) => println!("{}  {}", name.bold(), method.dimmed()),
			None => println!("{}  {}", name.bold(), "(no method)".dimmed()),
		}
	}
	Ok(())
}

async fn run_system_config(key: &str, value: &str, config: Option<PathBuf>) -> CommandResult<()> {
	let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
	let settings = SeederSettings::load(config.as_deref())?;
	let client = AdminApiClient::new(&settings.admin_api)?;
	client.set_system_config(key, value).await?;
	println!("{} {}", "Updated".green().bold(), key);
	Ok(())
}
