//! Fixture manager.
//!
//! The manager creates a fixture type after everything it depends on:
//!
//! 1. every requirement, recursively and in declared order,
//! 2. every declared piece of reference data (memoized per load key),
//! 3. the type's own payloads, each a fresh copy of a registry template with
//!    loaded values and overwrites applied, dispatched to its operation.
//!
//! A type is recorded as created only after all three phases succeed, and a
//! created type is never dispatched again until [`FixtureManager::reset`].
//! Calls take `&mut self`, so two creations can never interleave on one
//! manager.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{SeedingError, SeedingResult};
use crate::loader::{DataLoader, QueryInterface};
use crate::operation::{FixtureOperation, OperationRegistry};
use crate::overwrite::{Overwrites, set_path};
use crate::registry::{FixtureRegistry, FixtureTypeDefinition};

/// Session-scoped fixture creation context.
pub struct FixtureManager {
	registry: Arc<FixtureRegistry>,
	operations: HashMap<String, Arc<dyn FixtureOperation>>,
	query: Arc<dyn QueryInterface>,
	loader: DataLoader,
	created: Vec<String>,
	in_progress: Vec<String>,
}

impl FixtureManager {
	/// Creates a manager for one test session.
	///
	/// Every `method` in the registry is resolved against `operations` here,
	/// so a misspelled operation fails before anything is created.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnknownOperation`] for the first fixture type
	/// (by name) whose method is not registered.
	pub fn new(
		registry: Arc<FixtureRegistry>,
		operations: &OperationRegistry,
		query: Arc<dyn QueryInterface>,
	) -> SeedingResult<Self> {
		let mut resolved = HashMap::new();
		for fixture_type in registry.type_names() {
			let definition = registry.fixture_type(fixture_type)?;
			let Some(method) = &definition.method else {
				continue;
			};
			let operation =
				operations
					.get(method)
					.ok_or_else(|| SeedingError::UnknownOperation {
						fixture_type: fixture_type.to_string(),
						operation: method.clone(),
					})?;
			resolved.insert(fixture_type.to_string(), operation);
		}

		Ok(Self {
			registry,
			operations: resolved,
			query,
			loader: DataLoader::new(),
			created: Vec::new(),
			in_progress: Vec::new(),
		})
	}

	/// Creates a fixture type and everything it requires.
	///
	/// `overwrites` keys naming a requirement are forwarded to that
	/// requirement and removed; the remaining keys are set on each of this
	/// type's payloads, after loaded data is injected.
	///
	/// Calling this for a type that was already created is a no-op, and the
	/// overwrites of that call are discarded.
	///
	/// # Errors
	///
	/// - [`SeedingError::UnknownFixtureType`] if the type (or a requirement) is not registered
	/// - [`SeedingError::DataNotFound`] if a declared load matches nothing
	/// - [`SeedingError::DependencyCycle`] if the requirements loop back
	/// - any error returned by the query interface or an operation, unchanged
	pub async fn create_fixture(
		&mut self,
		fixture_type: &str,
		overwrites: Overwrites,
	) -> SeedingResult<()> {
		self.create_recursive(fixture_type, overwrites).await
	}

	/// Forgets which types were created, keeping loaded reference data.
	pub fn reset(&mut self) {
		tracing::debug!(
			created = self.created.len(),
			cached = self.loader.len(),
			"resetting created fixtures"
		);
		self.created.clear();
	}

	/// Returns true if the type was created since the last reset.
	pub fn is_created(&self, fixture_type: &str) -> bool {
		self.created.iter().any(|created| created == fixture_type)
	}

	/// Returns the types created since the last reset, in creation order.
	pub fn created_types(&self) -> &[String] {
		&self.created
	}

	/// Returns the reference data loaded during this session.
	pub fn loaded_data(&self) -> &DataLoader {
		&self.loader
	}

	/// Returns the registry this manager creates from.
	pub fn registry(&self) -> &FixtureRegistry {
		&self.registry
	}

	fn create_recursive<'a>(
		&'a mut self,
		fixture_type: &'a str,
		overwrites: Overwrites,
	) -> BoxFuture<'a, SeedingResult<()>> {
		Box::pin(async move {
			let registry = Arc::clone(&self.registry);
			let definition = registry.fixture_type(fixture_type)?;

			if self.is_created(fixture_type) {
				if !overwrites.is_empty() {
					tracing::warn!(
						fixture_type,
						discarded = overwrites.len(),
						"fixture type already created, overwrites of this call are ignored"
					);
				}
				return Ok(());
			}

			if self.in_progress.iter().any(|pending| pending == fixture_type) {
				let mut chain = self.in_progress.clone();
				chain.push(fixture_type.to_string());
				return Err(SeedingError::DependencyCycle(chain));
			}

			self.in_progress.push(fixture_type.to_string());
			let result = self.build(fixture_type, definition, overwrites).await;
			self.in_progress.pop();
			result?;

			self.created.push(fixture_type.to_string());
			tracing::debug!(fixture_type, "fixture type created");
			Ok(())
		})
	}

	async fn build(
		&mut self,
		fixture_type: &str,
		definition: &FixtureTypeDefinition,
		mut overwrites: Overwrites,
	) -> SeedingResult<()> {
		for requirement in &definition.requirements {
			let forwarded = overwrites.take_requirement(requirement)?;
			self.create_recursive(requirement, forwarded).await?;
		}

		self.loader
			.load_all(&definition.load, self.query.as_ref())
			.await?;

		let registry = Arc::clone(&self.registry);
		let operation = self.operations.get(fixture_type).cloned();

		for template in registry.templates(fixture_type) {
			let mut payload = template.clone();
			for spec in &definition.load {
				set_path(&mut payload, &spec.into, self.loader.value_for(spec)?);
			}
			overwrites.apply_to(&mut payload);

			let Some(operation) = &operation else {
				tracing::debug!(fixture_type, "no method declared, payload not persisted");
				continue;
			};

			tracing::info!(fixture_type, operation = operation.name(), "creating fixture");
			operation.create(payload).await.inspect_err(|error| {
				tracing::error!(fixture_type, %error, "fixture creation failed");
			})?;
		}

		Ok(())
	}
}

impl std::fmt::Debug for FixtureManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FixtureManager")
			.field("types", &self.registry.len())
			.field("created", &self.created)
			.field("loaded", &self.loader)
			.finish()
	}
}
