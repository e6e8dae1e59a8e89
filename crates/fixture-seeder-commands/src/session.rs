//! Seeding session.
//!
//! A session owns one [`FixtureManager`] wired to the admin API. Test suites
//! create one session per run and call
//! [`set_to_initial_state`](SeedingSession::set_to_initial_state) whenever the
//! system under test is restored, so fixtures are created again afterwards.

use std::sync::Arc;

use fixture_seeder_admin::{AdminApiClient, SeederSettings, operations_from_settings};
use fixture_seeder_core::{FixtureManager, FixtureRegistry, Overwrites};
use serde_json::Value;

use crate::error::CommandResult;

/// Fixture manager and admin API client for one test run
#[derive(Debug)]
pub struct SeedingSession {
	manager: FixtureManager,
	client: Arc<AdminApiClient>,
}

impl SeedingSession {
	/// Assembles a session from an existing manager and client.
	pub fn new(manager: FixtureManager, client: Arc<AdminApiClient>) -> Self {
		Self { manager, client }
	}

	/// Builds a session from settings.
	///
	/// Reads both registry files, creates the admin API client and resolves
	/// every configured operation.
	///
	/// # Errors
	///
	/// Returns an error if the settings are invalid, a registry file cannot be
	/// parsed, or a fixture type names an operation missing from `[operations]`.
	pub fn from_settings(settings: &SeederSettings) -> CommandResult<Self> {
		settings.validate()?;

		let registry = FixtureRegistry::from_paths(
			&settings.registry.fixtures,
			&settings.registry.fixture_types,
		)?;
		let client = Arc::new(AdminApiClient::new(&settings.admin_api)?);
		let operations = operations_from_settings(&settings.operations, Arc::clone(&client));
		let manager = FixtureManager::new(Arc::new(registry), &operations, client.clone())?;

		tracing::info!(
			types = manager.registry().len(),
			operations = operations.len(),
			api_path = client.api_path(),
			"seeding session ready"
		);
		Ok(Self { manager, client })
	}

	/// Creates a fixture type and everything it requires.
	pub async fn create(&mut self, fixture_type: &str, overwrites: Overwrites) -> CommandResult<()> {
		self.manager.create_fixture(fixture_type, overwrites).await?;
		Ok(())
	}

	/// Marks the system as restored, so every type is created again on demand.
	pub fn set_to_initial_state(&mut self) {
		self.manager.reset();
	}

	/// Sets one global system configuration value on the shop.
	pub async fn set_system_config(&self, key: &str, value: Value) -> CommandResult<()> {
		self.client.set_system_config(key, value).await?;
		Ok(())
	}

	/// Clones the CMS page named `original_name` under `cloned_name`.
	///
	/// Returns the id of the clone.
	pub async fn clone_cms_page(&self, original_name: &str, cloned_name: &str) -> CommandResult<String> {
		Ok(self.client.clone_cms_page(original_name, cloned_name).await?)
	}

	/// Assigns a CMS page to a category, returning `false` if the category does not exist.
	pub async fn set_category_cms_page(&self, category_name: &str, cms_page_id: &str) -> CommandResult<bool> {
		Ok(self
			.client
			.set_category_cms_page(category_name, cms_page_id)
			.await?)
	}

	/// Gives a sales channel a single domain with the named language, currency and snippet set.
	pub async fn add_domain_to_sales_channel(
		&self,
		sales_channel_name: &str,
		language_name: &str,
		currency_name: &str,
		snippet_set_name: &str,
		url: &str,
	) -> CommandResult<()> {
		self.client
			.add_domain_to_sales_channel(
				sales_channel_name,
				language_name,
				currency_name,
				snippet_set_name,
				url,
			)
			.await?;
		Ok(())
	}

	/// Returns the underlying manager.
	pub fn manager(&self) -> &FixtureManager {
		&self.manager
	}

	/// Returns the admin API client.
	pub fn client(&self) -> &AdminApiClient {
		&self.client
	}
}
