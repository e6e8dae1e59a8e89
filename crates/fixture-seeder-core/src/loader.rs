//! Shared reference data loading.
//!
//! Reference data is fetched through a [`QueryInterface`] and memoized per
//! load key for the lifetime of the [`DataLoader`]. The cache is never
//! invalidated by a manager reset.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SeedingError, SeedingResult};
use crate::overwrite::get_path;
use crate::registry::LoadSpec;

/// Lookup against the system under test.
///
/// Returning `Ok(None)` means the query legitimately matched nothing.
#[async_trait]
pub trait QueryInterface: Send + Sync {
	/// Runs a query descriptor and returns the first matching record.
	async fn search(&self, query: &Value) -> SeedingResult<Option<Value>>;
}

/// Memoizing loader for reference data.
#[derive(Debug, Default)]
pub struct DataLoader {
	cache: HashMap<String, Value>,
}

impl DataLoader {
	/// Creates a loader with an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Fetches every spec whose key is not cached yet, in order.
	///
	/// Records fetched before a failure stay cached.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::DataNotFound`] when a query yields no usable
	/// record, or whatever error the query interface reports.
	pub async fn load_all(
		&mut self,
		specs: &[LoadSpec],
		query: &dyn QueryInterface,
	) -> SeedingResult<()> {
		for spec in specs {
			if self.cache.contains_key(&spec.key) {
				tracing::debug!(key = %spec.key, "reference data already loaded");
				continue;
			}

			tracing::debug!(key = %spec.key, query = %spec.query, "loading reference data");
			let record = query
				.search(&spec.query)
				.await?
				.filter(|record| !is_absent(record))
				.ok_or_else(|| SeedingError::DataNotFound {
					key: spec.key.clone(),
					query: spec.query.clone(),
				})?;

			self.cache.insert(spec.key.clone(), record);
		}
		Ok(())
	}

	/// Returns the value a spec injects into a payload.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::DataNotFound`] if the key was never loaded and
	/// [`SeedingError::LoadedFieldMissing`] if the record lacks the field.
	pub fn value_for(&self, spec: &LoadSpec) -> SeedingResult<Value> {
		let record = self
			.cache
			.get(&spec.key)
			.ok_or_else(|| SeedingError::DataNotFound {
				key: spec.key.clone(),
				query: spec.query.clone(),
			})?;

		get_path(record, &spec.required_field)
			.cloned()
			.ok_or_else(|| SeedingError::LoadedFieldMissing {
				key: spec.key.clone(),
				field: spec.required_field.clone(),
			})
	}

	/// Returns the cached record for a key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.cache.get(key)
	}

	/// Returns true if the key has been loaded.
	pub fn contains(&self, key: &str) -> bool {
		self.cache.contains_key(key)
	}

	/// Returns the number of cached records.
	pub fn len(&self) -> usize {
		self.cache.len()
	}

	/// Returns true if nothing has been loaded.
	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}
}

// Stricter than a plain falsy check for empty containers, looser for `false`
// and `0`: `{}` and `[]` count as no match, scalars other than `""` are kept.
fn is_absent(record: &Value) -> bool {
	match record {
		Value::Null => true,
		Value::Object(map) => map.is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::String(text) => text.is_empty(),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;
	use rstest::rstest;
	use serde_json::json;

	struct StaticQuery {
		response: Option<Value>,
		calls: Mutex<Vec<Value>>,
	}

	impl StaticQuery {
		fn returning(response: Option<Value>) -> Self {
			Self {
				response,
				calls: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait]
	impl QueryInterface for StaticQuery {
		async fn search(&self, query: &Value) -> SeedingResult<Option<Value>> {
			self.calls.lock().push(query.clone());
			Ok(self.response.clone())
		}
	}

	fn tax_spec() -> LoadSpec {
		LoadSpec::new("tax", json!({"endpoint": "tax"}), "taxId", "id")
	}

	#[rstest]
	#[tokio::test]
	async fn test_load_all_caches_by_key() {
		let query = StaticQuery::returning(Some(json!({"id": "tax-1"})));
		let mut loader = DataLoader::new();

		loader.load_all(&[tax_spec()], &query).await.unwrap();
		loader.load_all(&[tax_spec()], &query).await.unwrap();

		assert_eq!(query.calls.lock().len(), 1);
		assert_eq!(loader.get("tax"), Some(&json!({"id": "tax-1"})));
	}

	#[rstest]
	#[tokio::test]
	async fn test_duplicate_keys_in_one_call_fetch_once() {
		let query = StaticQuery::returning(Some(json!({"id": "tax-1"})));
		let mut loader = DataLoader::new();

		loader
			.load_all(&[tax_spec(), tax_spec()], &query)
			.await
			.unwrap();

		assert_eq!(query.calls.lock().len(), 1);
	}

	#[rstest]
	#[case(None)]
	#[case(Some(Value::Null))]
	#[case(Some(json!({})))]
	#[case(Some(json!([])))]
	#[case(Some(json!("")))]
	#[tokio::test]
	async fn test_absent_result_is_data_not_found(#[case] response: Option<Value>) {
		let query = StaticQuery::returning(response);
		let mut loader = DataLoader::new();

		let result = loader.load_all(&[tax_spec()], &query).await;

		assert!(matches!(result, Err(SeedingError::DataNotFound { key, .. }) if key == "tax"));
		assert!(!loader.contains("tax"));
	}

	#[rstest]
	#[case(json!(false))]
	#[case(json!(0))]
	#[tokio::test]
	async fn test_scalar_result_is_kept(#[case] response: Value) {
		let query = StaticQuery::returning(Some(response.clone()));
		let mut loader = DataLoader::new();

		loader.load_all(&[tax_spec()], &query).await.unwrap();

		assert_eq!(loader.get("tax"), Some(&response));
	}

	#[rstest]
	#[tokio::test]
	async fn test_value_for_reads_required_field() {
		let query = StaticQuery::returning(Some(json!({"id": "tax-1", "name": "Standard"})));
		let mut loader = DataLoader::new();
		loader.load_all(&[tax_spec()], &query).await.unwrap();

		assert_eq!(loader.value_for(&tax_spec()).unwrap(), json!("tax-1"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_value_for_missing_field() {
		let query = StaticQuery::returning(Some(json!({"name": "Standard"})));
		let mut loader = DataLoader::new();
		loader.load_all(&[tax_spec()], &query).await.unwrap();

		let result = loader.value_for(&tax_spec());

		assert!(matches!(
			result,
			Err(SeedingError::LoadedFieldMissing { key, field }) if key == "tax" && field == "id"
		));
	}
}
