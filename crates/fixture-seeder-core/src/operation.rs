//! Persistence operations.
//!
//! Each fixture type names the operation its payloads are dispatched to. The
//! [`OperationRegistry`] is the explicit table those names are resolved
//! against, once, when a [`FixtureManager`](crate::FixtureManager) is built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SeedingResult;

/// A named persistence operation, typically one API call.
///
/// Implement this trait for each way a fixture payload can be created.
#[async_trait]
pub trait FixtureOperation: Send + Sync {
	/// Returns the operation name referenced by fixture-type definitions.
	fn name(&self) -> &str;

	/// Persists one assembled payload.
	///
	/// # Returns
	///
	/// Returns whatever the backend reports for the created record, or
	/// `Value::Null` when it reports nothing.
	async fn create(&self, payload: Value) -> SeedingResult<Value>;
}

/// Table of persistence operations keyed by name.
#[derive(Clone, Default)]
pub struct OperationRegistry {
	operations: HashMap<String, Arc<dyn FixtureOperation>>,
}

impl OperationRegistry {
	/// Creates an empty operation registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an operation under its own name, replacing any previous one.
	///
	/// # Example
	///
	/// ```ignore
	/// struct CreateCurrency;
	///
	/// #[async_trait]
	/// impl FixtureOperation for CreateCurrency {
	///     fn name(&self) -> &str { "createCurrency" }
	///     async fn create(&self, payload: Value) -> SeedingResult<Value> {
	///         // Post the payload to the API
	///         todo!()
	///     }
	/// }
	///
	/// let mut operations = OperationRegistry::new();
	/// operations.register(CreateCurrency);
	/// ```
	pub fn register<O: FixtureOperation + 'static>(&mut self, operation: O) {
		self.register_arc(Arc::new(operation));
	}

	/// Registers an already shared operation.
	pub fn register_arc(&mut self, operation: Arc<dyn FixtureOperation>) {
		let name = operation.name().to_string();
		if self.operations.insert(name.clone(), operation).is_some() {
			tracing::debug!(operation = %name, "replaced registered operation");
		}
	}

	/// Builder-style variant of [`register`](Self::register).
	pub fn with<O: FixtureOperation + 'static>(mut self, operation: O) -> Self {
		self.register(operation);
		self
	}

	/// Gets an operation by name.
	pub fn get(&self, name: &str) -> Option<Arc<dyn FixtureOperation>> {
		self.operations.get(name).cloned()
	}

	/// Checks if an operation is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.operations.contains_key(name)
	}

	/// Returns all registered operation names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.operations.keys().cloned().collect();
		names.sort_unstable();
		names
	}

	/// Returns the number of registered operations.
	pub fn len(&self) -> usize {
		self.operations.len()
	}

	/// Returns true if no operations are registered.
	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}
}

impl fmt::Debug for OperationRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OperationRegistry")
			.field("operations", &self.names())
			.finish()
	}
}
