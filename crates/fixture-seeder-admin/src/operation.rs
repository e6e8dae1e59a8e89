//! Persistence operations backed by the admin API.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use fixture_seeder_core::{FixtureOperation, OperationRegistry, SeedingError, SeedingResult};
use serde_json::Value;

use crate::client::AdminApiClient;

/// Creates records by posting payloads to one admin API endpoint.
#[derive(Debug, Clone)]
pub struct AdminApiOperation {
	name: String,
	endpoint: String,
	client: Arc<AdminApiClient>,
}

impl AdminApiOperation {
	/// Create an operation named `name` that posts to `endpoint`.
	pub fn new(
		name: impl Into<String>,
		endpoint: impl Into<String>,
		client: Arc<AdminApiClient>,
	) -> Self {
		Self {
			name: name.into(),
			endpoint: endpoint.into(),
			client,
		}
	}

	/// Returns the endpoint payloads are posted to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

#[async_trait]
impl FixtureOperation for AdminApiOperation {
	fn name(&self) -> &str {
		&self.name
	}

	async fn create(&self, payload: Value) -> SeedingResult<Value> {
		self.client
			.create(&self.endpoint, &payload)
			.await
			.map_err(|error| SeedingError::operation_failed(&self.name, error))
	}
}

/// Builds an operation registry from `operation name -> endpoint` pairs.
pub fn operations_from_settings(
	operations: &BTreeMap<String, String>,
	client: Arc<AdminApiClient>,
) -> OperationRegistry {
	let mut registry = OperationRegistry::new();
	for (name, endpoint) in operations {
		registry.register(AdminApiOperation::new(
			name.as_str(),
			endpoint.as_str(),
			Arc::clone(&client),
		));
	}
	tracing::debug!(count = registry.len(), "registered admin API operations");
	registry
}
